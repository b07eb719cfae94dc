//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot Table View - Renderable output of a single render pass.
//!
//! The view is a plain grid of typed cells: header rows first, then body
//! rows, each in input order. It owns all of its data and carries no
//! references back into the pivot input or the field resolver.

use engine::{FieldItem, ResultValue};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::conditional_formatting::AppliedFormatting;

// ============================================================================
// CELLS
// ============================================================================

/// Title cell in the top-left block, one per index column per header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleCell {
    /// Resolved label of the title field.
    pub label: Option<String>,
    /// No title field at this intersection.
    pub is_empty: bool,
    /// The title reads along the header axis.
    pub is_header_title: bool,
    pub description: Option<String>,
    /// Header level, counted from the innermost row (1) outwards.
    pub level: usize,
}

/// Header cell: a field label or a formatted header value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub content: Option<String>,
    pub is_label: bool,
    pub description: Option<String>,
    pub level: usize,
}

/// Index cell: a field label or a formatted index value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexCell {
    pub content: Option<String>,
    pub is_label: bool,
    pub description: Option<String>,
}

/// Value cell in the data area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueCell {
    pub row_index: usize,
    pub col_index: usize,
    /// The field or table calculation this cell is a value of.
    pub item: FieldItem,
    pub value: Option<ResultValue>,
    /// Every field value that contributed to this cell's position.
    pub underlying_values: FxHashMap<String, ResultValue>,
    pub formatting: Option<AppliedFormatting>,
}

impl ValueCell {
    pub fn formatted(&self) -> &str {
        self.value.as_ref().map_or("", |v| v.formatted.as_str())
    }
}

/// A single cell of the rendered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PivotTableCell {
    /// Blank cell above the row-number column.
    RowNumberCorner,
    /// 1-based row number.
    RowNumber { number: usize },
    Title(TitleCell),
    Header(HeaderCell),
    Index(IndexCell),
    Value(ValueCell),
}

impl PivotTableCell {
    /// The text this cell displays. Missing labels display as empty.
    pub fn text(&self) -> String {
        match self {
            PivotTableCell::RowNumberCorner => String::new(),
            PivotTableCell::RowNumber { number } => number.to_string(),
            PivotTableCell::Title(c) => c.label.clone().unwrap_or_default(),
            PivotTableCell::Header(c) => c.content.clone().unwrap_or_default(),
            PivotTableCell::Index(c) => c.content.clone().unwrap_or_default(),
            PivotTableCell::Value(c) => c.formatted().to_string(),
        }
    }

    /// Tooltip text, if the cell has one.
    pub fn description(&self) -> Option<&str> {
        match self {
            PivotTableCell::Title(c) => c.description.as_deref(),
            PivotTableCell::Header(c) => c.description.as_deref(),
            PivotTableCell::Index(c) => c.description.as_deref(),
            PivotTableCell::Value(c) => c.formatting.as_ref().map(|f| f.description.as_str()),
            PivotTableCell::RowNumberCorner | PivotTableCell::RowNumber { .. } => None,
        }
    }

    pub fn as_value(&self) -> Option<&ValueCell> {
        match self {
            PivotTableCell::Value(c) => Some(c),
            _ => None,
        }
    }
}

// ============================================================================
// ROWS
// ============================================================================

/// One rendered header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotHeaderRow {
    /// Header level (outermost row has the highest level, innermost is 1).
    pub level: usize,
    pub cells: Vec<PivotTableCell>,
}

/// One rendered body row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotBodyRow {
    /// 0-based position in the data values.
    pub row_index: usize,
    pub cells: Vec<PivotTableCell>,
}

impl PivotBodyRow {
    pub fn value_cells(&self) -> impl Iterator<Item = &ValueCell> {
        self.cells.iter().filter_map(PivotTableCell::as_value)
    }
}

// ============================================================================
// MAIN VIEW STRUCT
// ============================================================================

/// The complete rendered pivot table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotTableView {
    pub header_rows: Vec<PivotHeaderRow>,
    pub body_rows: Vec<PivotBodyRow>,
    /// Whether the row-number column is present.
    pub show_row_numbers: bool,
    pub index_column_count: usize,
}

impl PivotTableView {
    pub fn header_row_count(&self) -> usize {
        self.header_rows.len()
    }

    pub fn body_row_count(&self) -> usize {
        self.body_rows.len()
    }

    /// Gets the value cell at a data position.
    pub fn value_cell(&self, row: usize, col: usize) -> Option<&ValueCell> {
        self.body_rows
            .get(row)
            .and_then(|r| r.value_cells().nth(col))
    }

    /// Displayed text of every body row, for quick inspection.
    pub fn body_text(&self) -> Vec<Vec<String>> {
        self.body_rows
            .iter()
            .map(|r| r.cells.iter().map(PivotTableCell::text).collect())
            .collect()
    }

    /// Displayed text of every header row.
    pub fn header_text(&self) -> Vec<Vec<String>> {
        self.header_rows
            .iter()
            .map(|r| r.cells.iter().map(PivotTableCell::text).collect())
            .collect()
    }
}
