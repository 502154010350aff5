pub mod field_extractor;

pub use field_extractor::{extract_fields, FieldSpec};
