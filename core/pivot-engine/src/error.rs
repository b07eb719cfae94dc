//! FILENAME: core/pivot-engine/src/error.rs

use thiserror::Error;

use crate::definition::Axis;

#[derive(Error, Debug)]
pub enum PivotRenderError {
    #[error("Invalid pivot data: no field id on the metric axis for row {row}, column {col}")]
    InvalidPivotData { row: usize, col: usize },

    #[error("Invalid pivot data: {axis} label at row {row}, column {col} has no field id")]
    MissingLabelField { axis: Axis, row: usize, col: usize },

    #[error("Invalid pivot data: {axis} row {row} has no entry for column {col}")]
    MissingAxisValue { axis: Axis, row: usize, col: usize },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PivotRenderError {
    /// True for every error caused by malformed pivot input.
    pub fn is_invalid_pivot_data(&self) -> bool {
        matches!(
            self,
            PivotRenderError::InvalidPivotData { .. }
                | PivotRenderError::MissingLabelField { .. }
                | PivotRenderError::MissingAxisValue { .. }
        )
    }
}
