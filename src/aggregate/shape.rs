//! Runtime result shapes for aggregation queries.
//!
//! The number, names and types of the columns an aggregation returns are only
//! known once the request arrives. A [`ResultShape`] is an ordered list of
//! [`Slot`]s built per request; it decodes raw rows into [`AggregateRecord`]s.

use std::collections::HashSet;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::function::AggregateFn;
use crate::catalog::Column;
use crate::error::{ScopeError, ScopeResult};
use crate::sql::{ResultType, SelectItem, Value};

/// Alias of the leading grouping column.
pub const GROUPER: &str = "grouper";

/// One requested aggregate: a column and the function applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub column: Column,
    pub function: &'static AggregateFn,
}

impl Aggregation {
    pub fn new(column: Column, function: &'static AggregateFn) -> Self {
        Self { column, function }
    }
}

/// A named, typed result column.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// SQL alias: `result0`, `result1`, ...
    pub name: String,
    /// External key: `lower(fn)_column`.
    pub key: String,
    pub result_type: ResultType,
    statement: String,
}

/// The ordered slots of an aggregation, with an optional grouper slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultShape {
    grouper: Option<(String, ResultType)>,
    slots: Vec<Slot>,
}

impl ResultShape {
    /// Synthesize one slot per aggregation.
    ///
    /// Fails if two aggregations produce the same external key.
    pub fn build(aggregations: &[Aggregation], grouper: Option<&Column>) -> ScopeResult<Self> {
        let mut keys = HashSet::new();
        let mut slots = Vec::with_capacity(aggregations.len());

        for (i, agg) in aggregations.iter().enumerate() {
            let key = agg.function.key_for(&agg.column);
            if !keys.insert(key.clone()) {
                return Err(ScopeError::DuplicateAggregationKey(key));
            }
            slots.push(Slot {
                name: format!("result{}", i),
                key,
                result_type: agg.function.result_type_for(&agg.column),
                statement: format!("{}({})", agg.function.statement, agg.column.statement),
            });
        }

        Ok(Self {
            grouper: grouper.map(|g| (g.statement.clone(), g.result_type.nullable())),
            slots,
        })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn is_grouped(&self) -> bool {
        self.grouper.is_some()
    }

    /// Number of columns a row of this shape has.
    pub fn width(&self) -> usize {
        self.slots.len() + usize::from(self.is_grouped())
    }

    /// SELECT list: `[<group> AS grouper, ]FN(stmt) AS result0, ...`.
    pub fn select_items(&self) -> Vec<SelectItem> {
        self.grouper
            .iter()
            .map(|(statement, _)| SelectItem::new(statement.as_str()).with_alias(GROUPER))
            .chain(
                self.slots
                    .iter()
                    .map(|s| SelectItem::new(s.statement.as_str()).with_alias(&s.name)),
            )
            .collect()
    }

    /// Decode one row, coercing every cell into its slot type.
    pub fn decode(&self, row: Vec<Value>) -> ScopeResult<AggregateRecord> {
        if row.len() != self.width() {
            return Err(ScopeError::RowWidth {
                expected: self.width(),
                found: row.len(),
            });
        }

        let mut cells = row.into_iter();
        let grouper = match &self.grouper {
            Some((_, ty)) => cells
                .next()
                .map(|cell| coerce(GROUPER, *ty, cell))
                .transpose()?,
            None => None,
        };

        let values = self
            .slots
            .iter()
            .zip(cells)
            .map(|(slot, cell)| {
                Ok(Entry {
                    name: slot.name.clone(),
                    key: slot.key.clone(),
                    value: coerce(&slot.name, slot.result_type, cell)?,
                })
            })
            .collect::<ScopeResult<Vec<_>>>()?;

        Ok(AggregateRecord { grouper, values })
    }
}

fn coerce(slot: &str, expected: ResultType, cell: Value) -> ScopeResult<Value> {
    let found = cell.type_name();
    expected.coerce(cell).ok_or_else(|| ScopeError::Decode {
        slot: slot.to_string(),
        expected,
        found,
    })
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    name: String,
    key: String,
    value: Value,
}

/// A decoded aggregation row.
///
/// Serializes as a JSON object keyed by external key, preceded by `grouper`
/// for grouped rows: `{"grouper": 123, "sum_num": 123}`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    grouper: Option<Value>,
    values: Vec<Entry>,
}

impl AggregateRecord {
    /// Value by external key (`count_id`) or slot name (`result0`).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|e| e.key == name || e.name == name)
            .map(|e| &e.value)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn grouper(&self) -> Option<&Value> {
        self.grouper.as_ref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(key, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|e| (e.key.as_str(), &e.value))
    }
}

impl Serialize for AggregateRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.values.len() + usize::from(self.grouper.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(grouper) = &self.grouper {
            map.serialize_entry(GROUPER, grouper)?;
        }
        for entry in &self.values {
            map.serialize_entry(&entry.key, &entry.value)?;
        }
        map.end()
    }
}
