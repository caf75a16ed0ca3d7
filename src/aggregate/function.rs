//! The aggregate function table.

use crate::catalog::Column;
use crate::sql::ResultType;

/// An SQL aggregate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateFn {
    /// Canonical symbol, as accepted in `aggregation_type`.
    pub name: &'static str,
    /// SQL function name.
    pub statement: &'static str,
    /// Fixed result type; `None` yields the aggregated column's type.
    pub result_type: Option<ResultType>,
}

pub const COUNT: AggregateFn = AggregateFn {
    name: "COUNT",
    statement: "COUNT",
    result_type: Some(ResultType::integer()),
};

pub const SUM: AggregateFn = AggregateFn {
    name: "SUM",
    statement: "SUM",
    result_type: None,
};

pub const AVG: AggregateFn = AggregateFn {
    name: "AVG",
    statement: "AVG",
    result_type: None,
};

pub const MAX: AggregateFn = AggregateFn {
    name: "MAX",
    statement: "MAX",
    result_type: None,
};

pub const MIN: AggregateFn = AggregateFn {
    name: "MIN",
    statement: "MIN",
    result_type: None,
};

/// Every supported aggregate function.
pub static AGGREGATE_FUNCTIONS: [AggregateFn; 5] = [COUNT, SUM, AVG, MAX, MIN];

impl AggregateFn {
    /// Look up a function by name, case-insensitively.
    pub fn lookup(name: &str) -> Option<&'static AggregateFn> {
        let upper = name.to_uppercase();
        AGGREGATE_FUNCTIONS.iter().find(|f| f.name == upper)
    }

    /// External result key, e.g. `count_id`.
    pub fn key_for(&self, column: &Column) -> String {
        format!("{}_{}", self.name.to_lowercase(), column.name)
    }

    /// Type of `self(column)`.
    ///
    /// Functions without a fixed type may also yield NULL (`SUM` over no
    /// rows), so their type is widened to nullable.
    pub fn result_type_for(&self, column: &Column) -> ResultType {
        match self.result_type {
            Some(fixed) => fixed,
            None => column.result_type.nullable(),
        }
    }
}
