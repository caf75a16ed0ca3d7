//! Integration tests for the sort DSL against the `widgets` model.

#[path = "../common/mod.rs"]
mod common;

use common::{connection, insert, settings, widgets, ID_A, ID_B, ID_C};
use insta::assert_snapshot;
use scopekit::db::find_rows;
use scopekit::params::Params;
use scopekit::scope::for_paginate_from_params;
use scopekit::sort::for_sort_from_params;
use scopekit::{Collection, Dialect, Query, ScopeError, Value};

fn sort_params(columns: &str, directions: &str) -> Params {
    Params::new()
        .with("sort_columns", columns)
        .with("sort_directions", directions)
}

#[test]
fn test_custom_sort_overrides_default_column() {
    let scope = for_sort_from_params(
        &widgets(),
        &sort_params("num|name", "DESC|asc"),
        &settings().dsl,
    )
    .unwrap();
    assert_snapshot!(
        scope.apply(Query::new()).to_sql("widgets", Dialect::Postgres).sql,
        @r#"SELECT * FROM "widgets" AS "widgets" ORDER BY coalesce(widgets.num, 0) DESC, widgets.name ASC"#
    );
}

#[test]
fn test_sort_with_pagination() {
    let settings = settings();
    let params = sort_params("created_at|id", "ASC|ASC")
        .with("page", "2")
        .with("per_page", "25");

    let mut scopes = Collection::with_dialect(Dialect::MySql);
    scopes
        .push(for_sort_from_params(&widgets(), &params, &settings.dsl).unwrap())
        .push(for_paginate_from_params(&params, &settings.pagination));

    let sql = scopes
        .flatten()
        .unwrap()
        .apply(Query::new())
        .to_sql("widgets", Dialect::MySql)
        .sql;
    assert_snapshot!(
        sql,
        @"SELECT * FROM `widgets` AS `widgets` ORDER BY widgets.created_at ASC, widgets.id ASC LIMIT 25 OFFSET 25"
    );
}

#[test]
fn test_null_sorts_as_zero() {
    let conn = connection();
    insert(&conn, ID_A, Some(5), "alpha");
    insert(&conn, ID_B, None, "beta");
    insert(&conn, ID_C, Some(-1), "gamma");

    let scope =
        for_sort_from_params(&widgets(), &sort_params("num", "ASC"), &settings().dsl).unwrap();
    let names: Vec<Value> = find_rows(&conn, "widgets", &scope)
        .unwrap()
        .into_iter()
        .map(|row| row[2].clone())
        .collect();
    assert_eq!(
        names,
        vec![Value::from("gamma"), Value::from("beta"), Value::from("alpha")]
    );
}

#[test]
fn test_filter_only_column_is_not_sortable() {
    let err = for_sort_from_params(&widgets(), &sort_params("name_length", "ASC"), &settings().dsl)
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid sort field: name_length");
}

#[test]
fn test_direction_is_checked_before_column() {
    let err = for_sort_from_params(&widgets(), &sort_params("nope", "sideways"), &settings().dsl)
        .unwrap_err();
    assert!(matches!(err, ScopeError::InvalidSortDirection(d) if d == "sideways"));
}

#[test]
fn test_mismatched_lists() {
    let params = Params::new().with("sort_columns", "num|name");
    assert!(matches!(
        for_sort_from_params(&widgets(), &params, &settings().dsl),
        Err(ScopeError::MismatchedSortParams)
    ));
}
