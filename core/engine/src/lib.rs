//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Shared types for the pivot table renderer.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod field;
pub mod style;
pub mod value;

// Re-export commonly used types at the crate root
pub use field::{
    field_id, Field, FieldItem, FieldResolver, FieldType, FieldValueType, ItemsMap,
    TableCalculation,
};
pub use style::Color;
pub use value::{RawValue, ResultValue};
