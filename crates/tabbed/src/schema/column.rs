//! Column specification.

use serde::{Deserialize, Serialize};

use super::types::ColumnType;

/// Schema for a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Raw header text.
    pub name: String,
    /// Declared data type.
    pub column_type: ColumnType,
    /// 1-based ordinal within the type tag; `None` for opaque columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
    /// Name used to look the field up on a record.
    pub accessor: String,
}

impl ColumnSpec {
    /// Create a column with an explicit accessor and type.
    pub fn new(accessor: impl Into<String>, column_type: ColumnType) -> Self {
        let accessor = accessor.into();
        Self {
            name: accessor.clone(),
            column_type,
            ordinal: None,
            accessor,
        }
    }

    /// Create a column following the tag convention, e.g. `i2`.
    pub fn tagged(name: impl Into<String>, column_type: ColumnType, ordinal: u32) -> Self {
        Self {
            name: name.into(),
            column_type,
            ordinal: Some(ordinal),
            accessor: format!("{}{}", column_type.tag(), ordinal),
        }
    }

    /// Create an opaque string column named after its header text.
    pub fn opaque(name: impl Into<String>) -> Self {
        let name = name.into();
        let accessor = name.to_lowercase();
        Self {
            name,
            column_type: ColumnType::String,
            ordinal: None,
            accessor,
        }
    }

    /// Override the raw header text.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether this column follows the tag convention.
    pub fn is_tagged(&self) -> bool {
        self.ordinal.is_some()
    }
}
