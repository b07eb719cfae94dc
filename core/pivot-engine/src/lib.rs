//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot Table renderer.
//!
//! This crate turns precomputed pivot data into a renderable table. It
//! depends on `engine` only for shared types (ResultValue, FieldItem,
//! FieldResolver, Color).
//!
//! Layers:
//! - `definition`: Deserializable input (what the pivot data IS)
//! - `conditional_formatting`: Caller rules and their evaluation
//! - `view`: Renderable output (WHAT we display)
//! - `engine`: Render pass (HOW we build the view)
//! - `html`: Table markup for a view

pub mod conditional_formatting;
pub mod definition;
pub mod engine;
pub mod error;
pub mod html;
pub mod options;
pub mod view;

pub use conditional_formatting::*;
pub use definition::*;
pub use error::PivotRenderError;
pub use options::RenderOptions;
pub use view::*;
pub use crate::engine::{render_pivot_table, PivotTableRenderer};
pub use html::to_html;
