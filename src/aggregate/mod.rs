//! Aggregation and filter-option queries.
//!
//! Both run the caller's scope collection, prefixed with `is not null` guards
//! on the columns involved, as a single read against the database handle.
//!
//! # Example
//!
//! ```ignore
//! let aggs = resolve_aggregations(&filter_columns(&widgets)?, &[("num", "SUM")])?;
//! let record = aggregate(&conn, "widgets", &aggs, &Collection::with_connection(&conn))?;
//! assert_eq!(record.get_i64("sum_num"), Some(246));
//! ```

mod engine;
mod function;
mod options;
mod shape;

pub use engine::{
    aggregate, aggregate_from_params, aggregate_grouped, aggregate_grouped_from_params,
    aggregate_grouped_model, aggregate_model, aggregations_from_params, resolve_aggregations,
    AGGREGATION_COLUMN_KEY, AGGREGATION_GROUPER_KEY, AGGREGATION_TYPE_KEY,
};
pub use function::{AggregateFn, AGGREGATE_FUNCTIONS, AVG, COUNT, MAX, MIN, SUM};
pub use options::{distinct_values, filter_options};
pub use shape::{AggregateRecord, Aggregation, ResultShape, Slot, GROUPER};
