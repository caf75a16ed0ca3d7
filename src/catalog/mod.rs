//! Column catalog resolution.
//!
//! A model's effective filter (or sort) columns are the default columns
//! derived from its fields, overlaid by name with the columns the model
//! declares through [`Model::custom_filters`] / [`Model::custom_sorts`].

mod model;

pub use model::{
    ColumnDescriptor, Field, FieldDescriptor, Model, ModelDescriptor, ModelShape, SUPPRESSED,
};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};
use crate::sql::ResultType;

/// A SQL expression addressable by name from the DSL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub statement: String,
    #[serde(rename = "type")]
    pub result_type: ResultType,
}

impl Column {
    pub fn new(name: &str, statement: &str, result_type: ResultType) -> Self {
        Self {
            name: name.into(),
            statement: statement.into(),
            result_type,
        }
    }
}

/// Which DSL a catalog serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Filter,
    Sort,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Filter => f.write_str("filter"),
            CatalogKind::Sort => f.write_str("sort"),
        }
    }
}

/// The resolved, name-ordered column set for one model and DSL.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCatalog {
    kind: CatalogKind,
    columns: BTreeMap<String, Column>,
}

impl ColumnCatalog {
    pub fn new(kind: CatalogKind) -> Self {
        Self {
            kind,
            columns: BTreeMap::new(),
        }
    }

    pub fn from_columns(kind: CatalogKind, columns: impl IntoIterator<Item = Column>) -> Self {
        let mut catalog = Self::new(kind);
        catalog.overlay(columns);
        catalog
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    /// Insert columns, replacing existing entries with the same name.
    pub fn overlay(&mut self, columns: impl IntoIterator<Item = Column>) {
        for column in columns {
            self.columns.insert(column.name.clone(), column);
        }
    }

    /// Resolve a DSL column name.
    pub fn get(&self, name: &str) -> ScopeResult<&Column> {
        self.columns.get(name).ok_or_else(|| ScopeError::UnknownColumn {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Columns derived from a model's fields, without any custom overlay.
pub fn default_columns(model: &dyn Model) -> ScopeResult<Vec<Column>> {
    Ok(record_fields(model)?
        .iter()
        .filter_map(|field| {
            let (external, storage) = field.queryable_names()?;
            Some(Column::new(
                external,
                &format!("{}.{}", model.table_name(), storage),
                field.result_type,
            ))
        })
        .collect())
}

/// All columns filterable on a model.
pub fn filter_columns(model: &dyn Model) -> ScopeResult<ColumnCatalog> {
    let mut catalog = ColumnCatalog::from_columns(CatalogKind::Filter, default_columns(model)?);
    if let Some(custom) = model.custom_filters() {
        catalog.overlay(custom);
    }
    Ok(catalog)
}

/// All columns sortable on a model.
pub fn sort_columns(model: &dyn Model) -> ScopeResult<ColumnCatalog> {
    let mut catalog = ColumnCatalog::from_columns(CatalogKind::Sort, default_columns(model)?);
    if let Some(custom) = model.custom_sorts() {
        catalog.overlay(custom);
    }
    Ok(catalog)
}

pub fn filter_column_names(model: &dyn Model) -> ScopeResult<Vec<String>> {
    Ok(filter_columns(model)?.names())
}

pub fn sort_column_names(model: &dyn Model) -> ScopeResult<Vec<String>> {
    Ok(sort_columns(model)?.names())
}

/// Derive columns for a related model reachable through `join_clause`.
///
/// Given houses with an `address_id`, `subobject_columns(&address, "address",
/// "addresses.id = houses.address_id", None)` yields `address.city` with the
/// statement `(select city from addresses where addresses.id = houses.address_id)`.
pub fn subobject_columns(
    subobject: &dyn Model,
    prefix: &str,
    join_clause: &str,
    table_override: Option<&str>,
) -> ScopeResult<Vec<Column>> {
    let table = table_override.unwrap_or_else(|| subobject.table_name());

    Ok(record_fields(subobject)?
        .iter()
        .filter_map(|field| {
            let (external, storage) = field.queryable_names()?;
            Some(Column::new(
                &format!("{}.{}", prefix, external),
                &format!("(select {} from {} where {})", storage, table, join_clause),
                field.result_type,
            ))
        })
        .collect())
}

fn record_fields(model: &dyn Model) -> ScopeResult<Vec<Field>> {
    match model.shape() {
        ModelShape::Record(fields) => Ok(fields),
        ModelShape::Scalar(_) | ModelShape::List(_) => {
            Err(ScopeError::NotARecord(model.model_name().to_string()))
        }
    }
}
