//! Integration tests for scalar aggregation against SQLite.

#[path = "../common/mod.rs"]
mod common;

use common::{connection, insert, settings, two_widgets_same_num, widgets, ID_A, ID_B, ID_C};
use scopekit::aggregate::{aggregate_from_params, aggregate_model};
use scopekit::error::ErrorCategory;
use scopekit::filter::for_filters_from_params;
use scopekit::params::Params;
use scopekit::scope::for_id_for_model;
use scopekit::{Collection, Scope, ScopeError, Value};

fn agg_params(columns: &str, types: &str) -> Params {
    Params::new()
        .with("aggregation_column", columns)
        .with("aggregation_type", types)
}

#[test]
fn test_sum_over_two_rows() {
    let conn = two_widgets_same_num();
    let record = aggregate_from_params(
        &conn,
        &widgets(),
        &agg_params("num", "SUM"),
        &settings().dsl,
        &[],
    )
    .unwrap();
    assert_eq!(record.get("sum_num"), Some(&Value::Integer(246)));
    assert_eq!(record.get("result0"), Some(&Value::Integer(246)));
}

#[test]
fn test_count_decodes_as_integer() {
    let conn = two_widgets_same_num();
    let record = aggregate_from_params(
        &conn,
        &widgets(),
        &agg_params("id|num", "count|sum"),
        &settings().dsl,
        &[],
    )
    .unwrap();
    assert_eq!(record.get("count_id"), Some(&Value::Integer(2)));
    assert_eq!(record.len(), 2);
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"count_id":2,"sum_num":246}"#
    );
}

#[test]
fn test_caller_scopes_narrow_the_aggregation() {
    let conn = connection();
    insert(&conn, ID_A, Some(1), "alpha");
    insert(&conn, ID_B, Some(2), "beta");
    insert(&conn, ID_C, Some(3), "gamma");

    let model = widgets();
    let settings = settings();
    let filter = Params::new()
        .with("filter_columns", "id")
        .with("filter_types", "IN")
        .with("filter_values", &format!("{},{}", ID_A, ID_B));
    let scopes: Vec<Scope> = vec![
        for_filters_from_params(&model, &filter, &settings.dsl).unwrap(),
        for_id_for_model(ID_A, &model),
    ];

    let record = aggregate_from_params(
        &conn,
        &model,
        &agg_params("id", "COUNT"),
        &settings.dsl,
        &scopes,
    )
    .unwrap();
    assert_eq!(record.get_i64("count_id"), Some(1));
}

#[test]
fn test_null_rows_are_guarded_out() {
    let conn = connection();
    insert(&conn, ID_A, Some(4), "alpha");
    insert(&conn, ID_B, None, "beta");

    let mut scopes = Collection::with_connection(&conn);
    scopes.push(Scope::identity());
    let record = aggregate_model(&conn, &widgets(), &[("num", "AVG"), ("num", "MAX")], &scopes)
        .unwrap();
    assert_eq!(record.get_i64("avg_num"), Some(4));
    assert_eq!(record.get_i64("max_num"), Some(4));
}

#[test]
fn test_empty_table() {
    let conn = connection();
    let record = aggregate_model(
        &conn,
        &widgets(),
        &[("id", "COUNT"), ("num", "SUM")],
        &Collection::with_connection(&conn),
    )
    .unwrap();
    assert_eq!(record.get("count_id"), Some(&Value::Integer(0)));
    assert_eq!(record.get("sum_num"), Some(&Value::Null));
}

#[test]
fn test_text_min_max() {
    let conn = two_widgets_same_num();
    let record = aggregate_model(
        &conn,
        &widgets(),
        &[("name", "min"), ("name", "max")],
        &Collection::with_connection(&conn),
    )
    .unwrap();
    assert_eq!(record.get_str("min_name"), Some("alpha"));
    assert_eq!(record.get_str("max_name"), Some("beta"));
}

#[test]
fn test_non_integral_average_of_integer_column() {
    let conn = connection();
    insert(&conn, ID_A, Some(1), "alpha");
    insert(&conn, ID_B, Some(2), "beta");

    let err = aggregate_model(
        &conn,
        &widgets(),
        &[("num", "AVG")],
        &Collection::with_connection(&conn),
    )
    .unwrap_err();
    assert!(matches!(err, ScopeError::Decode { ref slot, .. } if slot == "result0"));
    assert_eq!(err.category(), ErrorCategory::Execution);
}

#[test]
fn test_duplicate_keys_reject_the_request() {
    let conn = two_widgets_same_num();
    let err = aggregate_from_params(
        &conn,
        &widgets(),
        &agg_params("id|id", "COUNT|count"),
        &settings().dsl,
        &[],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "duplicate aggregation parameter: count_id");
    assert_eq!(err.category(), ErrorCategory::DuplicateKey);
}

#[test]
fn test_request_errors() {
    let conn = two_widgets_same_num();
    let dsl = settings().dsl;

    let unknown_fn = aggregate_from_params(&conn, &widgets(), &agg_params("num", "MEDIAN"), &dsl, &[]);
    assert!(matches!(unknown_fn, Err(ScopeError::UnknownAggregation(f)) if f == "MEDIAN"));

    let unknown_col = aggregate_from_params(&conn, &widgets(), &agg_params("secret", "COUNT"), &dsl, &[]);
    assert_eq!(unknown_col.unwrap_err().to_string(), "invalid filter field: secret");

    let mismatched = aggregate_from_params(&conn, &widgets(), &agg_params("num|id", "SUM"), &dsl, &[]);
    assert!(matches!(mismatched, Err(ScopeError::MismatchedAggregationParams)));
}
