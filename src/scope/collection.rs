//! Ordered scope collections with content-based deduplication.

use std::collections::HashSet;

use super::hash::{compute_hash, Canonical};
use super::stub::render_fragment;
use super::Scope;
use crate::db::Database;
use crate::error::{ScopeError, ScopeResult};
use crate::sql::{Dialect, Query};

/// An ordered list of scopes owned by a single request.
///
/// Deduplication renders every scope to SQL, so it needs the dialect of the
/// connection the scopes will eventually run against.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    dialect: Option<Dialect>,
    scopes: Vec<Scope>,
}

impl Collection {
    /// A collection without a connection. [`Collection::dedupe`] and
    /// [`Collection::flatten`] fail on it.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connection(db: &dyn Database) -> Self {
        Self::with_dialect(db.dialect())
    }

    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect: Some(dialect),
            scopes: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Option<Dialect> {
        self.dialect
    }

    pub fn push(&mut self, scope: Scope) -> &mut Self {
        self.scopes.push(scope);
        self
    }

    pub fn extend(&mut self, scopes: impl IntoIterator<Item = Scope>) -> &mut Self {
        self.scopes.extend(scopes);
        self
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Drop every scope whose canonical SQL was already seen.
    ///
    /// The canonical form of a scope is its stub fragment (ORDER BY removed)
    /// plus its bound arguments. Scopes with an empty canonical form are
    /// always kept, so ordering-only scopes survive.
    pub fn dedupe(&mut self) -> ScopeResult<&mut Self> {
        let Some(dialect) = self.dialect else {
            log::error!("dedupe called on a scope collection without a connection");
            return Err(ScopeError::MissingConnection);
        };

        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(self.scopes.len());

        for scope in self.scopes.drain(..) {
            let fragment = render_fragment(&scope.apply(Query::new()), dialect);
            if fragment.sql.is_empty() {
                kept.push(scope);
                continue;
            }

            let hash = compute_hash(&Canonical {
                sql: &fragment.sql,
                args: &fragment.args,
            })?;

            if seen.insert(hash) {
                kept.push(scope);
            } else {
                log::debug!("dropping duplicate scope: {}", fragment.sql);
            }
        }

        self.scopes = kept;
        Ok(self)
    }

    /// Deduplicate, then compose the remaining scopes into one, in order.
    pub fn flatten(&mut self) -> ScopeResult<Scope> {
        self.dedupe()?;
        Ok(Scope::chain(self.scopes.clone()))
    }
}
