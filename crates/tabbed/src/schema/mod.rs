//! Column types, schemas, and header-driven schema inference.

mod column;
mod inference;
mod table;
mod types;

pub use column::ColumnSpec;
pub use inference::{OrdinalRule, derive_schema, derive_schema_with, schema_from_tokens, untyped_schema};
pub use table::Schema;
pub use types::{ColumnType, Value};
