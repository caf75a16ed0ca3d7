//! Error types for scope compilation, aggregation and execution.
//!
//! Every public operation returns [`ScopeResult`]. Compilation errors are
//! always raised before any SQL is sent to the database, so a failing
//! filter/sort/aggregation request never produces a partial query.

use crate::catalog::CatalogKind;
use crate::sql::ResultType;

/// Result type for scope operations.
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Coarse classification of a [`ScopeError`].
///
/// Callers translating errors into transport responses should match on this
/// instead of individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Cardinality mismatch, unknown operator/logic/direction code or bad parentheses.
    MalformedDsl,
    /// A column name that is not present in the merged catalog.
    UnresolvableColumn,
    /// Two aggregate/column pairs collide on the same result key.
    DuplicateKey,
    /// The database rejected the statement or returned something undecodable.
    Execution,
    /// The library was wired up incorrectly by the calling code.
    Misconfiguration,
}

#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("missing or mismatched filter parameters")]
    MismatchedFilterParams,

    #[error("invalid filter type: {0}")]
    InvalidFilterType(String),

    #[error("invalid filter logic: {0}")]
    InvalidFilterLogic(String),

    #[error("invalid filter parentheses: {0}")]
    InvalidFilterParens(String),

    #[error("missing or mismatched sort parameters")]
    MismatchedSortParams,

    #[error("invalid sort direction: {0}")]
    InvalidSortDirection(String),

    #[error("missing or mismatched aggregation parameters")]
    MismatchedAggregationParams,

    #[error("unknown aggregation type: {0}")]
    UnknownAggregation(String),

    #[error("invalid {kind} field: {name}")]
    UnknownColumn { kind: CatalogKind, name: String },

    #[error("model '{0}' is not a record type")]
    NotARecord(String),

    #[error("duplicate aggregation parameter: {0}")]
    DuplicateAggregationKey(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("query returned no rows")]
    NoRows,

    #[error("expected rows with {expected} column(s), got {found}")]
    RowWidth { expected: usize, found: usize },

    #[error("cannot decode {found} into '{slot}' ({expected})")]
    Decode {
        slot: String,
        expected: ResultType,
        found: &'static str,
    },

    #[error("cannot deduplicate scopes without a database connection")]
    MissingConnection,
}

impl ScopeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScopeError::MismatchedFilterParams
            | ScopeError::InvalidFilterType(_)
            | ScopeError::InvalidFilterLogic(_)
            | ScopeError::InvalidFilterParens(_)
            | ScopeError::MismatchedSortParams
            | ScopeError::InvalidSortDirection(_)
            | ScopeError::MismatchedAggregationParams
            | ScopeError::UnknownAggregation(_) => ErrorCategory::MalformedDsl,
            ScopeError::UnknownColumn { .. } => ErrorCategory::UnresolvableColumn,
            ScopeError::DuplicateAggregationKey(_) => ErrorCategory::DuplicateKey,
            ScopeError::Sqlite(_)
            | ScopeError::Json(_)
            | ScopeError::NoRows
            | ScopeError::RowWidth { .. }
            | ScopeError::Decode { .. } => ErrorCategory::Execution,
            ScopeError::NotARecord(_) | ScopeError::MissingConnection => {
                ErrorCategory::Misconfiguration
            }
        }
    }
}
