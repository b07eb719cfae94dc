//! FILENAME: core/pivot-engine/src/options.rs
//! PURPOSE: Caller-facing switches for a render.

use serde::{Deserialize, Serialize};

/// Render configuration. Missing keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Omit the row-number column (and its blank header corner).
    pub hide_row_numbers: bool,
    /// Attach field descriptions to title, header and index cells.
    pub show_descriptions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            hide_row_numbers: false,
            show_descriptions: true,
        }
    }
}

impl RenderOptions {
    pub fn with_hide_row_numbers(mut self, hide: bool) -> Self {
        self.hide_row_numbers = hide;
        self
    }

    pub fn with_show_descriptions(mut self, show: bool) -> Self {
        self.show_descriptions = show;
        self
    }
}
