//! Integration tests for the distinct-values (filter options) query.

#[path = "../common/mod.rs"]
mod common;

use common::{connection, insert, settings, widgets, ID_A, ID_B, ID_C};
use scopekit::aggregate::{distinct_values, filter_options};
use scopekit::catalog::filter_columns;
use scopekit::filter::for_filters_from_params;
use scopekit::params::Params;
use scopekit::{Collection, ScopeError, Value};

fn seeded() -> rusqlite::Connection {
    let conn = connection();
    insert(&conn, ID_A, Some(3), "alpha");
    insert(&conn, ID_B, None, "beta");
    insert(&conn, ID_C, Some(3), "gamma");
    conn
}

fn sorted(mut values: Vec<Value>) -> Vec<Value> {
    values.sort_by_key(|v| (v.as_i64(), v.as_str().map(str::to_string)));
    values
}

#[test]
fn test_distinct_values_exclude_null() {
    let conn = seeded();
    let values = filter_options(&conn, &widgets(), "num", &Collection::with_connection(&conn)).unwrap();
    assert_eq!(values, vec![Value::Integer(3)]);
}

#[test]
fn test_scoped_distinct_values() {
    let conn = seeded();
    let model = widgets();
    let params = Params::new()
        .with("filter_columns", "name")
        .with("filter_types", "NE")
        .with("filter_values", "gamma");

    let mut scopes = Collection::with_connection(&conn);
    scopes.push(for_filters_from_params(&model, &params, &settings().dsl).unwrap());

    let values = sorted(filter_options(&conn, &model, "name", &scopes).unwrap());
    assert_eq!(values, vec![Value::from("alpha"), Value::from("beta")]);
}

#[test]
fn test_values_take_the_column_type() {
    let conn = seeded();
    let catalog = filter_columns(&widgets()).unwrap();
    let length = catalog.get("name_length").unwrap();

    let values = sorted(
        distinct_values(&conn, "widgets", length, &Collection::with_connection(&conn)).unwrap(),
    );
    assert_eq!(values, vec![Value::Integer(4), Value::Integer(5)]);
}

#[test]
fn test_empty_table_has_no_options() {
    let conn = connection();
    let values = filter_options(&conn, &widgets(), "name", &Collection::with_connection(&conn)).unwrap();
    assert!(values.is_empty());
}

#[test]
fn test_unknown_column() {
    let conn = seeded();
    let err = filter_options(&conn, &widgets(), "secret", &Collection::with_connection(&conn))
        .unwrap_err();
    assert!(matches!(err, ScopeError::UnknownColumn { ref name, .. } if name == "secret"));
}
