//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Data - The precomputed, cross-tabulated input to a render.
//!
//! These structures are produced upstream from tabular query results and are
//! designed to be:
//! - Deserializable from the camelCase JSON the query layer emits
//! - Immutable for the duration of one render
//!
//! Shape contract (not validated here): `data_values` has one row per
//! `index_values` row and one column per innermost header column.

use std::fmt;

use engine::ResultValue;
use serde::{Deserialize, Serialize};

use crate::error::PivotRenderError;

// ============================================================================
// AXES
// ============================================================================

/// The two axes of a pivot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    /// Column headers (top).
    Header,
    /// Row index (left).
    Index,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Header => write!(f, "header"),
            Axis::Index => write!(f, "index"),
        }
    }
}

/// Whether an axis entry names a field or holds one of its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisValueKind {
    Label,
    Value,
}

/// One entry on the header or index axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PivotAxisValue {
    /// Displays the title of the referenced field.
    Label {
        #[serde(rename = "fieldId", default, skip_serializing_if = "Option::is_none")]
        field_id: Option<String>,
    },
    /// Displays a pre-formatted value of the referenced field.
    Value {
        #[serde(rename = "fieldId", default, skip_serializing_if = "Option::is_none")]
        field_id: Option<String>,
        value: ResultValue,
    },
}

impl PivotAxisValue {
    pub fn label(field_id: impl Into<String>) -> Self {
        PivotAxisValue::Label {
            field_id: Some(field_id.into()),
        }
    }

    pub fn value(field_id: impl Into<String>, value: ResultValue) -> Self {
        PivotAxisValue::Value {
            field_id: Some(field_id.into()),
            value,
        }
    }

    pub fn kind(&self) -> AxisValueKind {
        match self {
            PivotAxisValue::Label { .. } => AxisValueKind::Label,
            PivotAxisValue::Value { .. } => AxisValueKind::Value,
        }
    }

    pub fn is_label(&self) -> bool {
        self.kind() == AxisValueKind::Label
    }

    pub fn field_id(&self) -> Option<&str> {
        match self {
            PivotAxisValue::Label { field_id } | PivotAxisValue::Value { field_id, .. } => {
                field_id.as_deref()
            }
        }
    }
}

/// Role of a whole index column or header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisValueType {
    #[serde(rename = "type")]
    pub kind: AxisValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
}

impl AxisValueType {
    pub fn label() -> Self {
        AxisValueType {
            kind: AxisValueKind::Label,
            field_id: None,
        }
    }

    pub fn value(field_id: impl Into<String>) -> Self {
        AxisValueType {
            kind: AxisValueKind::Value,
            field_id: Some(field_id.into()),
        }
    }
}

// ============================================================================
// TITLES
// ============================================================================

/// Which axis a title field reads along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TitleDirection {
    Index,
    Header,
}

/// The field labelling a header-row / index-column intersection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleField {
    pub field_id: String,
    pub title_direction: TitleDirection,
}

impl TitleField {
    pub fn new(field_id: impl Into<String>, title_direction: TitleDirection) -> Self {
        TitleField {
            field_id: field_id.into(),
            title_direction,
        }
    }
}

// ============================================================================
// PIVOT DATA
// ============================================================================

/// How the pivot was configured upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotConfig {
    /// Dimensions spread across the header axis.
    #[serde(default)]
    pub pivot_dimensions: Vec<String>,

    /// Metrics are laid out as rows (index axis) instead of columns.
    #[serde(default)]
    pub metrics_as_rows: bool,
}

/// The complete input of one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotData {
    /// Header rows, outermost first. The last row is the innermost level.
    pub header_values: Vec<Vec<PivotAxisValue>>,

    /// Index entries, one row per data row.
    pub index_values: Vec<Vec<PivotAxisValue>>,

    /// Result cells, indexed as data_values[row][col].
    pub data_values: Vec<Vec<Option<ResultValue>>>,

    /// Title fields, indexed as title_fields[header_row][index_col].
    #[serde(default)]
    pub title_fields: Vec<Vec<Option<TitleField>>>,

    /// One entry per index column.
    pub index_value_types: Vec<AxisValueType>,

    /// One entry per header row.
    #[serde(default)]
    pub header_value_types: Vec<AxisValueType>,

    pub pivot_config: PivotConfig,
}

impl PivotData {
    /// Parses pivot data from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, PivotRenderError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn header_row_count(&self) -> usize {
        self.header_values.len()
    }

    pub fn index_column_count(&self) -> usize {
        self.index_value_types.len()
    }

    pub fn data_row_count(&self) -> usize {
        self.data_values.len()
    }

    /// Gets a result cell, if present and non-null.
    pub fn data_value(&self, row: usize, col: usize) -> Option<&ResultValue> {
        self.data_values
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(Option::as_ref)
    }

    /// Gets the title field for a header row / index column intersection.
    pub fn title_field(&self, header_row: usize, index_col: usize) -> Option<&TitleField> {
        self.title_fields
            .get(header_row)
            .and_then(|r| r.get(index_col))
            .and_then(Option::as_ref)
    }
}
