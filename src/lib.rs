//! # Scopekit
//!
//! A query-scoping layer for list, aggregate and filter-option endpoints.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Request parameters (filter / sort / paging)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [filter, sort + column catalog]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Scopes (Query -> Query)                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [collection: dedupe + flatten]
//! ┌─────────────────────────────────────────────────────────┐
//! │            Composite scope over a stub query             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [aggregate / options / find_rows]
//! ┌─────────────────────────────────────────────────────────┐
//! │          SQL + bound arguments -> Database handle        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Request values are always bound as arguments. Column statements and
//! scope clauses are developer-supplied SQL and are emitted verbatim.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod params;
pub mod scope;
pub mod sort;
pub mod sql;

pub use sql::dialect;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::aggregate::{
        aggregate, aggregate_from_params, aggregate_grouped, aggregate_grouped_from_params,
        distinct_values, filter_options, AggregateFn, AggregateRecord, Aggregation,
    };
    pub use crate::catalog::{
        filter_columns, sort_columns, subobject_columns, CatalogKind, Column, ColumnCatalog,
        Field, Model, ModelDescriptor, ModelShape,
    };
    pub use crate::config::{DslSettings, PaginationSettings, Settings};
    pub use crate::db::{find_rows, Database};
    pub use crate::error::{ErrorCategory, ScopeError, ScopeResult};
    pub use crate::filter::{compile_filters, for_filters_from_params};
    pub use crate::params::{ParamValues, Params};
    pub use crate::scope::{Collection, Paginator, Scope};
    pub use crate::sort::{compile_sort, for_sort_from_params};
    pub use crate::sql::{Dialect, Query, ResultType, SqlDialect, Value};
}

// Also export at crate root for convenience
pub use error::{ScopeError, ScopeResult};
pub use scope::{Collection, Scope};
pub use sql::{Dialect, Query, Value};
