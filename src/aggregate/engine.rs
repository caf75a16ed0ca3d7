//! Scalar and grouped aggregation over a scope collection.
//!
//! Pipeline: resolve columns, synthesize the result shape, compose not-null
//! guards with the caller's scopes, render the stub fragment, execute and
//! decode.

use super::function::AggregateFn;
use super::shape::{AggregateRecord, Aggregation, ResultShape};
use crate::catalog::{filter_columns, ColumnCatalog, Column, Model};
use crate::config::DslSettings;
use crate::db::Database;
use crate::error::{ScopeError, ScopeResult};
use crate::params::{filter_separator, ParamValues};
use crate::scope::{for_not_null, render_fragment, Collection, Scope};
use crate::sql::{Query, RenderedSql, SelectItem, Token, TokenStream, Value};

pub const AGGREGATION_COLUMN_KEY: &str = "aggregation_column";
pub const AGGREGATION_TYPE_KEY: &str = "aggregation_type";
pub const AGGREGATION_GROUPER_KEY: &str = "aggregation_grouper_column";

/// Guard every statement with `is not null`, append the caller's scopes and
/// render the resulting WHERE/JOIN/GROUP BY/LIMIT tail.
pub(crate) fn scoped_fragment(
    db: &dyn Database,
    not_null: &[&str],
    scopes: &Collection,
    group_by: Option<&str>,
) -> ScopeResult<RenderedSql> {
    let mut collection = Collection::with_connection(db);
    for statement in not_null {
        collection.push(for_not_null(statement));
    }
    collection.extend(scopes.scopes().iter().cloned());

    let mut query = collection.flatten()?.apply(Query::new()).unordered();
    if let Some(statement) = group_by {
        query = query.group_by(statement);
    }
    Ok(render_fragment(&query, db.dialect()))
}

/// `SELECT <items> FROM <table> <fragment>`.
pub(crate) fn select_statement(
    db: &dyn Database,
    items: &[SelectItem],
    table: &str,
    fragment: &RenderedSql,
) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Select).space();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&item.to_tokens());
    }
    ts.space()
        .push(Token::From)
        .space()
        .push(Token::Ident(table.into()));
    if !fragment.sql.is_empty() {
        ts.space().push(Token::Raw(fragment.sql.clone()));
    }
    ts.serialize(db.dialect())
}

fn run(
    db: &dyn Database,
    table: &str,
    aggregations: &[Aggregation],
    grouper: Option<&Column>,
    scopes: &Collection,
) -> ScopeResult<(ResultShape, Vec<Vec<Value>>)> {
    let shape = ResultShape::build(aggregations, grouper)?;

    let guarded: Vec<&str> = aggregations
        .iter()
        .map(|a| a.column.statement.as_str())
        .collect();
    let fragment = scoped_fragment(db, &guarded, scopes, grouper.map(|g| g.statement.as_str()))?;
    let sql = select_statement(db, &shape.select_items(), table, &fragment);

    log::debug!("aggregate: {} {:?}", sql, fragment.args);
    let rows = db.fetch_rows(&sql, &fragment.args)?;
    Ok((shape, rows))
}

/// Aggregate `table` without grouping, decoding exactly one row.
pub fn aggregate(
    db: &dyn Database,
    table: &str,
    aggregations: &[Aggregation],
    scopes: &Collection,
) -> ScopeResult<AggregateRecord> {
    let (shape, rows) = run(db, table, aggregations, None, scopes)?;
    let row = rows.into_iter().next().ok_or(ScopeError::NoRows)?;
    shape.decode(row)
}

/// Aggregate `table` grouped by `grouper`. Zero groups is a valid result.
pub fn aggregate_grouped(
    db: &dyn Database,
    table: &str,
    aggregations: &[Aggregation],
    grouper: &Column,
    scopes: &Collection,
) -> ScopeResult<Vec<AggregateRecord>> {
    let (shape, rows) = run(db, table, aggregations, Some(grouper), scopes)?;
    rows.into_iter().map(|row| shape.decode(row)).collect()
}

/// Resolve `(column name, function name)` pairs against a catalog.
pub fn resolve_aggregations(
    catalog: &ColumnCatalog,
    requests: &[(&str, &str)],
) -> ScopeResult<Vec<Aggregation>> {
    requests
        .iter()
        .map(|&(column, name)| {
            let function = AggregateFn::lookup(name)
                .ok_or_else(|| ScopeError::UnknownAggregation(name.to_string()))?;
            Ok(Aggregation::new(catalog.get(column)?.clone(), function))
        })
        .collect()
}

/// Read `aggregation_column` / `aggregation_type` into aggregations.
pub fn aggregations_from_params(
    catalog: &ColumnCatalog,
    params: &dyn ParamValues,
    dsl: &DslSettings,
) -> ScopeResult<Vec<Aggregation>> {
    let separator = filter_separator(params, dsl);
    let columns = params.list(AGGREGATION_COLUMN_KEY, &separator);
    let types = params.list(AGGREGATION_TYPE_KEY, &separator);

    if columns.len() != types.len() || columns.is_empty() {
        return Err(ScopeError::MismatchedAggregationParams);
    }

    let requests: Vec<(&str, &str)> = columns
        .iter()
        .zip(&types)
        .map(|(c, t)| (c.as_str(), t.as_str()))
        .collect();
    resolve_aggregations(catalog, &requests)
}

/// Scalar aggregation of a model's table, columns resolved by name.
pub fn aggregate_model(
    db: &dyn Database,
    model: &dyn Model,
    requests: &[(&str, &str)],
    scopes: &Collection,
) -> ScopeResult<AggregateRecord> {
    let aggregations = resolve_aggregations(&filter_columns(model)?, requests)?;
    aggregate(db, model.table_name(), &aggregations, scopes)
}

/// Grouped aggregation of a model's table, columns resolved by name.
pub fn aggregate_grouped_model(
    db: &dyn Database,
    model: &dyn Model,
    requests: &[(&str, &str)],
    grouper: &str,
    scopes: &Collection,
) -> ScopeResult<Vec<AggregateRecord>> {
    let catalog = filter_columns(model)?;
    let aggregations = resolve_aggregations(&catalog, requests)?;
    let grouper = catalog.get(grouper)?;
    aggregate_grouped(db, model.table_name(), &aggregations, grouper, scopes)
}

/// Scalar aggregation driven by request parameters.
pub fn aggregate_from_params(
    db: &dyn Database,
    model: &dyn Model,
    params: &dyn ParamValues,
    dsl: &DslSettings,
    scopes: &[Scope],
) -> ScopeResult<AggregateRecord> {
    let catalog = filter_columns(model)?;
    let aggregations = aggregations_from_params(&catalog, params, dsl)?;
    let mut collection = Collection::with_connection(db);
    collection.extend(scopes.iter().cloned());
    aggregate(db, model.table_name(), &aggregations, &collection)
}

/// Grouped aggregation driven by request parameters.
///
/// The grouping column comes from `aggregation_grouper_column`.
pub fn aggregate_grouped_from_params(
    db: &dyn Database,
    model: &dyn Model,
    params: &dyn ParamValues,
    dsl: &DslSettings,
    scopes: &[Scope],
) -> ScopeResult<Vec<AggregateRecord>> {
    let catalog = filter_columns(model)?;
    let aggregations = aggregations_from_params(&catalog, params, dsl)?;
    let grouper_name = params
        .get_non_blank(AGGREGATION_GROUPER_KEY)
        .ok_or(ScopeError::MismatchedAggregationParams)?;
    let grouper = catalog.get(grouper_name.trim())?;

    let mut collection = Collection::with_connection(db);
    collection.extend(scopes.iter().cloned());
    aggregate_grouped(db, model.table_name(), &aggregations, grouper, &collection)
}
