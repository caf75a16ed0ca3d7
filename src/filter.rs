//! Filter DSL compiler.
//!
//! Filters arrive as parallel, separator-delimited lists:
//!
//! ```text
//! filter_columns=num|name|id
//! filter_types=GT|ILK|IN
//! filter_values=10|%bob%|a,b,c
//! filter_logic=AND|OR
//! filter_left_parens=1
//! filter_right_parens=2
//! ```
//!
//! which compile to one parenthesized condition with bound arguments:
//!
//! ```text
//! (t.num > ? AND (t.name ilike ? OR t.id in (?, ?, ?)))
//! ```

use std::collections::HashMap;

use crate::catalog::{filter_columns, ColumnCatalog, Model};
use crate::config::DslSettings;
use crate::error::{ScopeError, ScopeResult};
use crate::params::{filter_args_separator, filter_separator, ParamValues};
use crate::scope::{Scope, FAIL_QUERY};
use crate::sql::{Clause, Value};

/// Comparison operators accepted in `filter_types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Null,
    NotNull,
    Like,
    ILike,
    NotLike,
    NotILike,
    DistinctFrom,
    NotDistinctFrom,
    In,
    NotIn,
}

/// Number of arguments an operator binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    One,
    Many,
}

impl FilterOperator {
    const TABLE: [(&'static str, FilterOperator); 16] = [
        ("EQ", FilterOperator::Eq),
        ("NE", FilterOperator::Ne),
        ("LT", FilterOperator::Lt),
        ("GT", FilterOperator::Gt),
        ("LTE", FilterOperator::Lte),
        ("GTE", FilterOperator::Gte),
        ("NU", FilterOperator::Null),
        ("NN", FilterOperator::NotNull),
        ("LK", FilterOperator::Like),
        ("ILK", FilterOperator::ILike),
        ("NLK", FilterOperator::NotLike),
        ("NILK", FilterOperator::NotILike),
        ("DF", FilterOperator::DistinctFrom),
        ("NDF", FilterOperator::NotDistinctFrom),
        ("IN", FilterOperator::In),
        ("NIN", FilterOperator::NotIn),
    ];

    /// Look up an operator code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        let upper = code.to_uppercase();
        Self::TABLE
            .iter()
            .find(|(c, _)| *c == upper)
            .map(|(_, op)| *op)
    }

    pub fn code(&self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, op)| op == self)
            .map(|(c, _)| *c)
            .unwrap_or_default()
    }

    pub fn sql(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Ne => "!=",
            FilterOperator::Lt => "<",
            FilterOperator::Gt => ">",
            FilterOperator::Lte => "<=",
            FilterOperator::Gte => ">=",
            FilterOperator::Null => "is null",
            FilterOperator::NotNull => "is not null",
            FilterOperator::Like => "like",
            FilterOperator::ILike => "ilike",
            FilterOperator::NotLike => "not like",
            FilterOperator::NotILike => "not ilike",
            FilterOperator::DistinctFrom => "is distinct from",
            FilterOperator::NotDistinctFrom => "is not distinct from",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not in",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            FilterOperator::Null | FilterOperator::NotNull => Arity::None,
            FilterOperator::In | FilterOperator::NotIn => Arity::Many,
            _ => Arity::One,
        }
    }
}

/// Logic codes joining consecutive filter clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterLogic {
    And,
    Or,
}

impl FilterLogic {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "AND" => Some(FilterLogic::And),
            "OR" => Some(FilterLogic::Or),
            _ => None,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            FilterLogic::And => "AND",
            FilterLogic::Or => "OR",
        }
    }
}

/// One compiled clause before it is joined with its neighbours.
#[derive(Debug, Clone, PartialEq)]
struct FilterClause {
    statement: String,
    operator: FilterOperator,
    args: Vec<Value>,
    left_parens: String,
    right_parens: String,
}

impl FilterClause {
    fn to_sql(&self) -> String {
        let (lp, rp) = (&self.left_parens, &self.right_parens);
        let op = self.operator.sql();

        match self.operator.arity() {
            Arity::None => format!("{}{} {}{}", lp, self.statement, op, rp),
            Arity::One => format!("{}{} {} ?{}", lp, self.statement, op, rp),
            Arity::Many if self.args.is_empty() => format!("{}{}{}", lp, FAIL_QUERY, rp),
            Arity::Many => {
                let placeholders = vec!["?"; self.args.len()].join(", ");
                format!("{}{} {} ({}){}", lp, self.statement, op, placeholders, rp)
            }
        }
    }
}

/// Compile filter parameters into a single condition.
///
/// Returns `None` when no filter parameters are present.
pub fn filter_expression(
    catalog: &ColumnCatalog,
    params: &dyn ParamValues,
    dsl: &DslSettings,
) -> ScopeResult<Option<Clause>> {
    let separator = filter_separator(params, dsl);
    let args_separator = filter_args_separator(params, dsl);

    let columns = params.list("filter_columns", &separator);
    let types = params.list("filter_types", &separator);
    let left_parens = params.list("filter_left_parens", &separator);
    let right_parens = params.list("filter_right_parens", &separator);
    let logic = params.list("filter_logic", &separator);

    // An empty value is a legal filter value (`name = ''`), so this list is
    // never treated as blank.
    let values: Vec<&str> = params
        .get("filter_values")
        .unwrap_or_default()
        .split(separator.as_str())
        .collect();

    if columns.is_empty()
        && types.is_empty()
        && values.len() == 1
        && logic.is_empty()
        && left_parens.is_empty()
        && right_parens.is_empty()
    {
        return Ok(None);
    }

    if columns.len() != types.len()
        || columns.len() != values.len()
        || columns.len() != logic.len() + 1
        || left_parens.len() != right_parens.len()
    {
        return Err(ScopeError::MismatchedFilterParams);
    }

    let mut clauses = Vec::with_capacity(columns.len());
    for ((name, code), value) in columns.iter().zip(&types).zip(&values) {
        let operator = FilterOperator::from_code(code)
            .ok_or_else(|| ScopeError::InvalidFilterType(code.clone()))?;
        let column = catalog.get(name)?;

        let args = match operator.arity() {
            Arity::None => vec![],
            Arity::One => vec![Value::from(*value)],
            Arity::Many if value.trim().is_empty() => vec![],
            Arity::Many => value.split(args_separator.as_str()).map(Value::from).collect(),
        };

        clauses.push(FilterClause {
            statement: column.statement.clone(),
            operator,
            args,
            left_parens: String::new(),
            right_parens: String::new(),
        });
    }

    for (index, count) in paren_counts(&left_parens, columns.len())? {
        clauses[index].left_parens = "(".repeat(count);
    }
    for (index, count) in paren_counts(&right_parens, columns.len())? {
        clauses[index].right_parens = ")".repeat(count);
    }

    let mut sql = clauses[0].to_sql();
    for (code, clause) in logic.iter().zip(&clauses[1..]) {
        let logic = FilterLogic::from_code(code)
            .ok_or_else(|| ScopeError::InvalidFilterLogic(code.clone()))?;
        sql = format!("{} {} {}", sql, logic.sql(), clause.to_sql());
    }

    let args = clauses.into_iter().flat_map(|c| c.args).collect();
    Ok(Some(Clause::new(format!("({})", sql), args)))
}

/// Validate parenthesis positions and count the parens at each clause index.
fn paren_counts(positions: &[String], clause_count: usize) -> ScopeResult<HashMap<usize, usize>> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for raw in positions {
        let index = raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|i| *i < clause_count)
            .ok_or_else(|| ScopeError::InvalidFilterParens(raw.clone()))?;
        *counts.entry(index).or_default() += 1;
    }
    Ok(counts)
}

/// Compile filter parameters against a resolved catalog.
pub fn compile_filters(
    catalog: &ColumnCatalog,
    params: &dyn ParamValues,
    dsl: &DslSettings,
) -> ScopeResult<Scope> {
    let Some(clause) = filter_expression(catalog, params, dsl)? else {
        return Ok(Scope::identity());
    };

    log::debug!("compiled filter: {} {:?}", clause.sql, clause.args);
    Ok(Scope::new(move |q| q.filter(clause.sql.clone(), clause.args.clone())))
}

/// Compile filter parameters for a model's filter columns.
pub fn for_filters_from_params(
    model: &dyn Model,
    params: &dyn ParamValues,
    dsl: &DslSettings,
) -> ScopeResult<Scope> {
    compile_filters(&filter_columns(model)?, params, dsl)
}
