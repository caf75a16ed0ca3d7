//! Integration tests for the filter DSL against the `widgets` model.

#[path = "../common/mod.rs"]
mod common;

use common::{connection, insert, settings, widgets, ID_A, ID_B, ID_C};
use insta::assert_snapshot;
use scopekit::db::find_rows;
use scopekit::error::ErrorCategory;
use scopekit::filter::for_filters_from_params;
use scopekit::params::Params;
use scopekit::{Dialect, Query, ScopeError, Value};

fn compile(params: &Params, dialect: Dialect) -> Result<String, ScopeError> {
    let scope = for_filters_from_params(&widgets(), params, &settings().dsl)?;
    Ok(scope.apply(Query::new()).to_sql("widgets", dialect).sql)
}

// ============================================================================
// SQL shape
// ============================================================================

#[test]
fn test_filter_sql_postgres() {
    let params = Params::new()
        .with("filter_columns", "num|name")
        .with("filter_types", "GT|ILK")
        .with("filter_values", "10|%al%")
        .with("filter_logic", "AND");
    assert_snapshot!(
        compile(&params, Dialect::Postgres).unwrap(),
        @r#"SELECT * FROM "widgets" AS "widgets" WHERE (widgets.num > $1 AND widgets.name ilike $2)"#
    );
}

#[test]
fn test_filter_sql_mysql() {
    let params = Params::new()
        .with("filter_columns", "id|num")
        .with("filter_types", "IN|NN")
        .with("filter_values", "a,b,c|")
        .with("filter_logic", "or")
        .with("filter_left_parens", "0")
        .with("filter_right_parens", "1");
    assert_snapshot!(
        compile(&params, Dialect::MySql).unwrap(),
        @"SELECT * FROM `widgets` AS `widgets` WHERE ((widgets.id in (?, ?, ?) OR widgets.num is not null))"
    );
}

#[test]
fn test_custom_separators_from_request() {
    let params = Params::new()
        .with("filter_separator", ";")
        .with("filter_args_separator", "~")
        .with("filter_columns", "name;num")
        .with("filter_types", "NIN;LTE")
        .with("filter_values", "a|b~c;5")
        .with("filter_logic", "AND");
    assert_snapshot!(
        compile(&params, Dialect::Sqlite).unwrap(),
        @r#"SELECT * FROM "widgets" AS "widgets" WHERE (widgets.name not in (?, ?) AND widgets.num <= ?)"#
    );
}

#[test]
fn test_no_filter_params_is_noop() {
    assert_snapshot!(
        compile(&Params::new(), Dialect::Postgres).unwrap(),
        @r#"SELECT * FROM "widgets" AS "widgets""#
    );
}

// ============================================================================
// Execution
// ============================================================================

#[test]
fn test_in_filter_selects_listed_ids() {
    let conn = connection();
    insert(&conn, ID_A, Some(1), "alpha");
    insert(&conn, ID_B, Some(2), "beta");
    insert(&conn, ID_C, Some(3), "gamma");

    let params = Params::new()
        .with("filter_columns", "id")
        .with("filter_types", "IN")
        .with("filter_values", &format!("{},{}", ID_A, ID_C));
    let scope = for_filters_from_params(&widgets(), &params, &settings().dsl).unwrap();
    let rows = find_rows(&conn, "widgets", &scope).unwrap();

    let mut ids: Vec<_> = rows.iter().map(|r| r[0].clone()).collect();
    ids.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
    assert_eq!(ids, vec![Value::from(ID_A), Value::from(ID_C)]);
}

#[test]
fn test_empty_in_matches_nothing() {
    let conn = connection();
    insert(&conn, ID_A, Some(1), "alpha");

    let params = Params::new()
        .with("filter_columns", "id")
        .with("filter_types", "IN")
        .with("filter_values", "");
    let scope = for_filters_from_params(&widgets(), &params, &settings().dsl).unwrap();
    assert!(find_rows(&conn, "widgets", &scope).unwrap().is_empty());
}

#[test]
fn test_text_values_compare_against_integer_column() {
    let conn = connection();
    insert(&conn, ID_A, Some(5), "alpha");
    insert(&conn, ID_B, Some(50), "beta");

    let params = Params::new()
        .with("filter_columns", "num")
        .with("filter_types", "GT")
        .with("filter_values", "10");
    let scope = for_filters_from_params(&widgets(), &params, &settings().dsl).unwrap();
    let rows = find_rows(&conn, "widgets", &scope).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], Value::from(ID_B));
}

#[test]
fn test_custom_filter_column() {
    let conn = connection();
    insert(&conn, ID_A, Some(1), "alpha");
    insert(&conn, ID_B, Some(2), "beta");

    let params = Params::new()
        .with("filter_columns", "name_length")
        .with("filter_types", "EQ")
        .with("filter_values", "4");
    let scope = for_filters_from_params(&widgets(), &params, &settings().dsl).unwrap();
    let rows = find_rows(&conn, "widgets", &scope).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][2], Value::from("beta"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_suppressed_field_is_not_filterable() {
    let params = Params::new()
        .with("filter_columns", "secret")
        .with("filter_types", "EQ")
        .with("filter_values", "x");
    let err = compile(&params, Dialect::Postgres).unwrap_err();
    assert_eq!(err.to_string(), "invalid filter field: secret");
    assert_eq!(err.category(), ErrorCategory::UnresolvableColumn);
}

#[test]
fn test_operator_is_checked_before_column() {
    let params = Params::new()
        .with("filter_columns", "nope")
        .with("filter_types", "XX")
        .with("filter_values", "1");
    assert!(matches!(
        compile(&params, Dialect::Postgres),
        Err(ScopeError::InvalidFilterType(code)) if code == "XX"
    ));
}

#[test]
fn test_parens_are_checked_before_logic() {
    let params = Params::new()
        .with("filter_columns", "num|num")
        .with("filter_types", "EQ|EQ")
        .with("filter_values", "1|2")
        .with("filter_logic", "XOR")
        .with("filter_left_parens", "-1")
        .with("filter_right_parens", "1");
    let err = compile(&params, Dialect::Postgres).unwrap_err();
    assert!(matches!(err, ScopeError::InvalidFilterParens(_)));
    assert_eq!(err.category(), ErrorCategory::MalformedDsl);
}

#[test]
fn test_unknown_logic_code_rejects_the_whole_filter() {
    let params = Params::new()
        .with("filter_columns", "num|num")
        .with("filter_types", "EQ|EQ")
        .with("filter_values", "1|2")
        .with("filter_logic", "XOR")
        .with("filter_left_parens", "0")
        .with("filter_right_parens", "1");
    let result = for_filters_from_params(&widgets(), &params, &settings().dsl);
    let Err(err) = result else {
        panic!("an unknown logic code must not yield a scope");
    };
    assert!(matches!(err, ScopeError::InvalidFilterLogic(ref code) if code == "XOR"));
    assert_eq!(err.category(), ErrorCategory::MalformedDsl);
}

#[test]
fn test_unbalanced_paren_lists_are_mismatched() {
    let params = Params::new()
        .with("filter_columns", "num")
        .with("filter_types", "EQ")
        .with("filter_values", "1")
        .with("filter_left_parens", "0");
    assert!(matches!(
        compile(&params, Dialect::Postgres),
        Err(ScopeError::MismatchedFilterParams)
    ));
}
