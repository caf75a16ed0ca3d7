//! Filter options: the distinct non-null values of one column.

use super::engine::{scoped_fragment, select_statement};
use crate::catalog::{filter_columns, Column, Model};
use crate::db::Database;
use crate::error::{ScopeError, ScopeResult};
use crate::scope::Collection;
use crate::sql::{SelectItem, Value};

/// Alias of the single selected column.
pub const RESULT: &str = "result";

/// Distinct values of `column` within `scopes`, NULL excluded.
///
/// Renders `SELECT <stmt> AS result FROM <table> WHERE <stmt> is not null
/// ... GROUP BY <stmt>` and coerces each value to the column's type.
pub fn distinct_values(
    db: &dyn Database,
    table: &str,
    column: &Column,
    scopes: &Collection,
) -> ScopeResult<Vec<Value>> {
    let statement = column.statement.as_str();
    let fragment = scoped_fragment(db, &[statement], scopes, Some(statement))?;
    let items = [SelectItem::new(statement).with_alias(RESULT)];
    let sql = select_statement(db, &items, table, &fragment);

    log::debug!("distinct_values: {} {:?}", sql, fragment.args);
    db.fetch_rows(&sql, &fragment.args)?
        .into_iter()
        .map(|row| decode(column, row))
        .collect()
}

fn decode(column: &Column, row: Vec<Value>) -> ScopeResult<Value> {
    let [cell]: [Value; 1] = row
        .try_into()
        .map_err(|row: Vec<Value>| ScopeError::RowWidth {
            expected: 1,
            found: row.len(),
        })?;
    let found = cell.type_name();
    column
        .result_type
        .coerce(cell)
        .ok_or_else(|| ScopeError::Decode {
            slot: RESULT.to_string(),
            expected: column.result_type,
            found,
        })
}

/// Distinct values of a model's filter column, looked up by name.
pub fn filter_options(
    db: &dyn Database,
    model: &dyn Model,
    column: &str,
    scopes: &Collection,
) -> ScopeResult<Vec<Value>> {
    let catalog = filter_columns(model)?;
    distinct_values(db, model.table_name(), catalog.get(column)?, scopes)
}
