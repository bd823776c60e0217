//! Type definitions for the decision-support form

pub mod prediction;
pub mod record;
pub mod schema;

pub use prediction::PredictionResult;
pub use record::{Column, ColumnValue, InputRecord};
pub use schema::{FieldKind, FieldSpec, INPUT_FIELDS};
