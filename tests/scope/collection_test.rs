//! Integration tests for scope collections and deduplication.

#[path = "../common/mod.rs"]
mod common;

use common::{connection, insert, settings, widgets, ID_A, ID_B};
use insta::assert_snapshot;
use scopekit::db::find_rows;
use scopekit::error::ErrorCategory;
use scopekit::filter::for_filters_from_params;
use scopekit::params::Params;
use scopekit::scope::{for_id_for_model, for_limit, for_null_deleted_at, for_order};
use scopekit::{Collection, Dialect, Query, Scope, ScopeError};

fn render(scope: &Scope, dialect: Dialect) -> String {
    scope.apply(Query::new()).to_sql("widgets", dialect).sql
}

fn num_filter(value: &str) -> Scope {
    let params = Params::new()
        .with("filter_columns", "num")
        .with("filter_types", "EQ")
        .with("filter_values", value);
    for_filters_from_params(&widgets(), &params, &settings().dsl).unwrap()
}

#[test]
fn test_independent_identical_scopes_collapse() {
    let mut scopes = Collection::with_dialect(Dialect::Postgres);
    scopes.push(num_filter("1")).push(num_filter("1"));

    let flat = scopes.flatten().unwrap();
    assert_eq!(scopes.len(), 1);
    assert_snapshot!(
        render(&flat, Dialect::Postgres),
        @r#"SELECT * FROM "widgets" AS "widgets" WHERE (widgets.num = $1)"#
    );
}

#[test]
fn test_different_arguments_are_kept() {
    let mut scopes = Collection::with_dialect(Dialect::Postgres);
    scopes.push(num_filter("1")).push(num_filter("2"));
    scopes.dedupe().unwrap();
    assert_eq!(scopes.len(), 2);
}

#[test]
fn test_first_occurrence_wins_and_order_is_kept() {
    let model = widgets();
    let mut scopes = Collection::with_dialect(Dialect::Sqlite);
    scopes
        .push(for_id_for_model(ID_A, &model))
        .push(for_null_deleted_at())
        .push(for_id_for_model(ID_A, &model))
        .push(for_limit(3));

    let flat = scopes.flatten().unwrap();
    assert_eq!(scopes.len(), 3);
    assert_snapshot!(
        render(&flat, Dialect::Sqlite),
        @r#"SELECT * FROM "widgets" AS "widgets" WHERE widgets.id = ? AND deleted_at is null LIMIT 3"#
    );
}

#[test]
fn test_ordering_does_not_participate_in_equivalence() {
    let mut scopes = Collection::with_dialect(Dialect::Postgres);
    scopes
        .push(Scope::new(|q| q.filter("widgets.num > 0", vec![]).order("widgets.name ASC")))
        .push(Scope::new(|q| q.filter("widgets.num > 0", vec![]).order("widgets.id DESC")));

    let flat = scopes.flatten().unwrap();
    assert_eq!(scopes.len(), 1);
    assert_snapshot!(
        render(&flat, Dialect::Postgres),
        @r#"SELECT * FROM "widgets" AS "widgets" WHERE widgets.num > 0 ORDER BY widgets.name ASC"#
    );
}

#[test]
fn test_ordering_only_scopes_are_never_dropped() {
    let mut scopes = Collection::with_dialect(Dialect::Postgres);
    scopes
        .push(for_order(&["widgets.name ASC"]))
        .push(for_order(&["widgets.id ASC"]))
        .push(Scope::identity());
    scopes.dedupe().unwrap();
    assert_eq!(scopes.len(), 3);
}

#[test]
fn test_dedupe_is_idempotent() {
    let mut scopes = Collection::with_dialect(Dialect::MySql);
    scopes
        .push(num_filter("7"))
        .push(for_limit(2))
        .push(num_filter("7"))
        .push(for_limit(2));

    let once = render(&scopes.flatten().unwrap(), Dialect::MySql);
    let twice = render(&scopes.flatten().unwrap(), Dialect::MySql);
    assert_eq!(scopes.len(), 2);
    assert_eq!(once, twice);
}

#[test]
fn test_missing_connection_fails_loudly() {
    let mut scopes = Collection::new();
    scopes.push(num_filter("1"));

    let err = scopes.flatten().unwrap_err();
    assert!(matches!(err, ScopeError::MissingConnection));
    assert_eq!(err.category(), ErrorCategory::Misconfiguration);
}

#[test]
fn test_flattened_scope_runs_against_sqlite() {
    let conn = connection();
    insert(&conn, ID_A, Some(1), "alpha");
    insert(&conn, ID_B, Some(1), "beta");

    let model = widgets();
    let mut scopes = Collection::with_connection(&conn);
    scopes
        .push(num_filter("1"))
        .push(for_id_for_model(ID_B, &model))
        .push(num_filter("1"));

    let rows = find_rows(&conn, "widgets", &scopes.flatten().unwrap()).unwrap();
    assert_eq!(scopes.dialect(), Some(Dialect::Sqlite));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][2].as_str(), Some("beta"));
}
