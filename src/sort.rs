//! Sort DSL compiler.
//!
//! `sort_columns=num|name&sort_directions=desc|ASC` compiles to
//! `ORDER BY t.num DESC, t.name ASC`.

use crate::catalog::{sort_columns, ColumnCatalog, Model};
use crate::config::DslSettings;
use crate::error::{ScopeError, ScopeResult};
use crate::params::{filter_separator, ParamValues};
use crate::scope::{for_order, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "ASC" => Some(SortDirection::Asc),
            "DESC" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Compile sort parameters into ORDER BY clauses, in listed order.
pub fn sort_clauses(
    catalog: &ColumnCatalog,
    params: &dyn ParamValues,
    dsl: &DslSettings,
) -> ScopeResult<Vec<String>> {
    let separator = filter_separator(params, dsl);
    let columns = params.list("sort_columns", &separator);
    let directions = params.list("sort_directions", &separator);

    if columns.len() != directions.len() {
        return Err(ScopeError::MismatchedSortParams);
    }

    columns
        .iter()
        .zip(&directions)
        .map(|(name, code)| {
            let direction = SortDirection::from_code(code)
                .ok_or_else(|| ScopeError::InvalidSortDirection(code.clone()))?;
            let column = catalog.get(name)?;
            Ok(format!("{} {}", column.statement, direction.sql()))
        })
        .collect()
}

/// Compile sort parameters against a resolved catalog.
pub fn compile_sort(
    catalog: &ColumnCatalog,
    params: &dyn ParamValues,
    dsl: &DslSettings,
) -> ScopeResult<Scope> {
    let clauses = sort_clauses(catalog, params, dsl)?;
    if clauses.is_empty() {
        return Ok(Scope::identity());
    }

    log::debug!("compiled sort: {}", clauses.join(", "));
    let refs: Vec<&str> = clauses.iter().map(String::as_str).collect();
    Ok(for_order(&refs))
}

/// Compile sort parameters for a model's sort columns.
pub fn for_sort_from_params(
    model: &dyn Model,
    params: &dyn ParamValues,
    dsl: &DslSettings,
) -> ScopeResult<Scope> {
    compile_sort(&sort_columns(model)?, params, dsl)
}
