//! Model metadata consumed by the column catalog.

use serde::{Deserialize, Serialize};

use super::Column;
use crate::sql::ResultType;

/// Marker that suppresses a field from the catalog when used as a name.
pub const SUPPRESSED: &str = "-";

/// A model field carrying an externally visible name and a storage name.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub external_name: Option<String>,
    pub storage_name: Option<String>,
    pub result_type: ResultType,
}

impl Field {
    pub fn new(external_name: &str, storage_name: &str, result_type: ResultType) -> Self {
        Self {
            external_name: Some(external_name.into()),
            storage_name: Some(storage_name.into()),
            result_type,
        }
    }

    /// The `(external, storage)` name pair, if both are present and neither is suppressed.
    pub fn queryable_names(&self) -> Option<(&str, &str)> {
        let external = self.external_name.as_deref().filter(|n| is_visible(n))?;
        let storage = self.storage_name.as_deref().filter(|n| is_visible(n))?;
        Some((external, storage))
    }
}

fn is_visible(name: &str) -> bool {
    !name.is_empty() && name != SUPPRESSED
}

/// Structural shape of a model descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelShape {
    Record(Vec<Field>),
    Scalar(ResultType),
    List(Box<ModelShape>),
}

/// A queryable model: a table plus field metadata.
///
/// `custom_filters` / `custom_sorts` are optional capabilities. Returning
/// `None` means the model declares no overlay.
pub trait Model {
    fn model_name(&self) -> &str;

    fn table_name(&self) -> &str;

    fn shape(&self) -> ModelShape;

    fn custom_filters(&self) -> Option<Vec<Column>> {
        None
    }

    fn custom_sorts(&self) -> Option<Vec<Column>> {
        None
    }
}

// =============================================================================
// TOML descriptors
// =============================================================================

/// A field of a [`ModelDescriptor`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldDescriptor {
    /// External (DSL-facing) name.
    #[serde(default)]
    pub name: Option<String>,

    /// Storage column name.
    #[serde(default)]
    pub column: Option<String>,

    #[serde(rename = "type")]
    pub result_type: ResultType,

    #[serde(default)]
    pub nullable: bool,
}

/// A custom filter/sort column of a [`ModelDescriptor`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub statement: String,

    #[serde(rename = "type")]
    pub result_type: ResultType,

    #[serde(default)]
    pub nullable: bool,
}

impl From<&ColumnDescriptor> for Column {
    fn from(desc: &ColumnDescriptor) -> Self {
        Column::new(
            &desc.name,
            &desc.statement,
            with_nullability(desc.result_type, desc.nullable),
        )
    }
}

/// A model declared in configuration rather than in code.
///
/// ```toml
/// [[models]]
/// name = "widget"
/// table = "widgets"
///
/// [[models.fields]]
/// name = "id"
/// column = "id"
/// type = "uuid"
///
/// [[models.custom_sorts]]
/// name = "num_text"
/// statement = "CAST(widgets.num AS TEXT)"
/// type = "text"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub table: String,

    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    #[serde(default)]
    pub custom_filters: Option<Vec<ColumnDescriptor>>,

    #[serde(default)]
    pub custom_sorts: Option<Vec<ColumnDescriptor>>,
}

impl Model for ModelDescriptor {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn table_name(&self) -> &str {
        &self.table
    }

    fn shape(&self) -> ModelShape {
        ModelShape::Record(
            self.fields
                .iter()
                .map(|f| Field {
                    external_name: f.name.clone(),
                    storage_name: f.column.clone(),
                    result_type: with_nullability(f.result_type, f.nullable),
                })
                .collect(),
        )
    }

    fn custom_filters(&self) -> Option<Vec<Column>> {
        self.custom_filters
            .as_ref()
            .map(|cols| cols.iter().map(Column::from).collect())
    }

    fn custom_sorts(&self) -> Option<Vec<Column>> {
        self.custom_sorts
            .as_ref()
            .map(|cols| cols.iter().map(Column::from).collect())
    }
}

fn with_nullability(ty: ResultType, nullable: bool) -> ResultType {
    if nullable {
        ty.nullable()
    } else {
        ty
    }
}
