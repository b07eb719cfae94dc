//! FILENAME: core/engine/src/field.rs
//! PURPOSE: Field descriptors and the capability used to resolve them by id.
//! CONTEXT: A pivot cell only stores a field id string. Whatever hosts the
//! renderer supplies a `FieldResolver` that turns the id into either a
//! dimension/metric `Field` or a `TableCalculation`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Whether a field groups rows or aggregates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Dimension,
    Metric,
}

/// Semantic type of the values a field produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldValueType {
    #[default]
    String,
    Number,
    Date,
    Timestamp,
    Boolean,
    Count,
    CountDistinct,
    Sum,
    Average,
    Min,
    Max,
    Median,
    Percentile,
}

impl FieldValueType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldValueType::Number
                | FieldValueType::Count
                | FieldValueType::CountDistinct
                | FieldValueType::Sum
                | FieldValueType::Average
                | FieldValueType::Min
                | FieldValueType::Max
                | FieldValueType::Median
                | FieldValueType::Percentile
        )
    }
}

/// Builds the id of a table field: `<table>_<name>` with dots escaped.
pub fn field_id(table: &str, name: &str) -> String {
    format!("{}_{}", table, name).replace('.', "__")
}

/// A dimension or metric defined on a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub field_type: FieldType,
    #[serde(rename = "type", default)]
    pub value_type: FieldValueType,
    pub table: String,
    pub table_label: String,
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

impl Field {
    fn new(
        field_type: FieldType,
        value_type: FieldValueType,
        table: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        let table = table.into();
        Field {
            field_type,
            value_type,
            table_label: table.clone(),
            table,
            name: name.into(),
            label: label.into(),
            description: None,
            hidden: false,
        }
    }

    pub fn dimension(
        table: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        value_type: FieldValueType,
    ) -> Self {
        Field::new(FieldType::Dimension, value_type, table, name, label)
    }

    pub fn metric(
        table: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        value_type: FieldValueType,
    ) -> Self {
        Field::new(FieldType::Metric, value_type, table, name, label)
    }

    pub fn with_table_label(mut self, table_label: impl Into<String>) -> Self {
        self.table_label = table_label.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field_id(&self) -> String {
        field_id(&self.table, &self.name)
    }
}

/// A calculation evaluated over the result set after the query ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCalculation {
    pub name: String,
    pub display_name: String,
    pub sql: String,
}

impl TableCalculation {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>, sql: impl Into<String>) -> Self {
        TableCalculation {
            name: name.into(),
            display_name: display_name.into(),
            sql: sql.into(),
        }
    }
}

/// Anything a pivot cell's field id can resolve to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldItem {
    Field(Field),
    TableCalculation(TableCalculation),
}

impl FieldItem {
    pub fn is_field(&self) -> bool {
        matches!(self, FieldItem::Field(_))
    }

    pub fn is_dimension(&self) -> bool {
        matches!(self, FieldItem::Field(f) if f.field_type == FieldType::Dimension)
    }

    pub fn is_metric(&self) -> bool {
        matches!(self, FieldItem::Field(f) if f.field_type == FieldType::Metric)
    }

    /// Table calculations are always treated as numeric.
    pub fn is_numeric(&self) -> bool {
        match self {
            FieldItem::Field(f) => f.value_type.is_numeric(),
            FieldItem::TableCalculation(_) => true,
        }
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            FieldItem::Field(f) => Some(f),
            FieldItem::TableCalculation(_) => None,
        }
    }

    /// The id this item is referenced by in pivot data.
    pub fn item_id(&self) -> String {
        match self {
            FieldItem::Field(f) => f.field_id(),
            FieldItem::TableCalculation(tc) => tc.name.clone(),
        }
    }

    /// Only fields carry descriptions.
    pub fn description(&self) -> Option<&str> {
        self.as_field().and_then(|f| f.description.as_deref())
    }

    pub fn label(&self) -> String {
        match self {
            FieldItem::Field(f) => format!("{} {}", f.table_label, f.label),
            FieldItem::TableCalculation(tc) => tc.display_name.clone(),
        }
    }
}

impl From<Field> for FieldItem {
    fn from(field: Field) -> Self {
        FieldItem::Field(field)
    }
}

impl From<TableCalculation> for FieldItem {
    fn from(calc: TableCalculation) -> Self {
        FieldItem::TableCalculation(calc)
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Resolves field ids found in pivot data.
pub trait FieldResolver {
    fn get_field(&self, field_id: &str) -> Option<&FieldItem>;

    fn get_field_label(&self, field_id: &str) -> Option<String> {
        self.get_field(field_id).map(FieldItem::label)
    }
}

/// Field id -> item lookup, with optional per-field label overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsMap {
    items: FxHashMap<String, FieldItem>,
    #[serde(default)]
    custom_labels: FxHashMap<String, String>,
}

impl ItemsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item under its own id, returning the item it replaced.
    pub fn insert(&mut self, item: impl Into<FieldItem>) -> Option<FieldItem> {
        let item = item.into();
        self.items.insert(item.item_id(), item)
    }

    /// Overrides the label shown for a field id.
    pub fn set_custom_label(&mut self, field_id: impl Into<String>, label: impl Into<String>) {
        self.custom_labels.insert(field_id.into(), label.into());
    }

    pub fn with_custom_label(mut self, field_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.set_custom_label(field_id, label);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<FieldItem> for ItemsMap {
    fn from_iter<I: IntoIterator<Item = FieldItem>>(iter: I) -> Self {
        let mut map = ItemsMap::new();
        for item in iter {
            map.insert(item);
        }
        map
    }
}

impl FieldResolver for ItemsMap {
    fn get_field(&self, field_id: &str) -> Option<&FieldItem> {
        self.items.get(field_id)
    }

    fn get_field_label(&self, field_id: &str) -> Option<String> {
        if let Some(label) = self.custom_labels.get(field_id) {
            return Some(label.clone());
        }
        let label = self.get_field(field_id).map(FieldItem::label);
        if label.is_none() {
            log::warn!("[ItemsMap] no label for unknown field '{}'", field_id);
        }
        label
    }
}
