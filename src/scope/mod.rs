//! Composable query transformations.
//!
//! A [`Scope`] wraps a pure `Query -> Query` function. Scopes are built by the
//! filter/sort compilers, the standard scopes in [`standard`] and pagination,
//! then collected into a [`Collection`] that deduplicates and flattens them
//! into a single composite scope.

mod collection;
mod hash;
pub mod paginate;
pub mod standard;
mod stub;

pub use collection::Collection;
pub use hash::compute_hash;
pub use paginate::{for_paginate, for_paginate_from_params, Paginator};
pub use standard::*;
pub use stub::{render_fragment, STUB_TABLE};

use std::fmt;
use std::sync::Arc;

use crate::sql::Query;

/// A stateless query transformation.
#[derive(Clone)]
pub struct Scope(Arc<dyn Fn(Query) -> Query + Send + Sync>);

impl Scope {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Query) -> Query + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// The scope that leaves a query untouched.
    pub fn identity() -> Self {
        Self::new(|q| q)
    }

    /// Apply every scope in order, without deduplication.
    pub fn chain(scopes: Vec<Scope>) -> Self {
        Self::new(move |q| scopes.iter().fold(q, |q, s| s.apply(q)))
    }

    pub fn apply(&self, query: Query) -> Query {
        (self.0)(query)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scope(..)")
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::identity()
    }
}
