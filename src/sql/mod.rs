//! SQL generation module.
//!
//! Scopes never build SQL text directly; they transform a [`Query`], which is
//! rendered per dialect through [`TokenStream`]s.
//!
//! - [`query`] - SELECT query builder with bound arguments
//! - [`value`] - bound parameter / decoded cell values and result types
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod query;
pub mod token;
pub mod value;

pub use dialect::{Dialect, SqlDialect};
pub use query::{Clause, Query, RenderedSql, SelectItem};
pub use token::{Token, TokenStream};
pub use value::{ResultType, ScalarKind, Value};
