//! Table-level schema definition.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::column::ColumnSpec;
use crate::error::{Result, TabbedError};

/// Ordered, immutable set of columns for a file.
///
/// Accessor names are unique. Serializes as a plain array of column specs;
/// deserializing re-checks uniqueness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnSpec>", into = "Vec<ColumnSpec>")]
pub struct Schema {
    columns: IndexMap<String, ColumnSpec>,
}

impl Schema {
    /// Create a schema from explicit columns.
    pub fn from_columns(columns: impl IntoIterator<Item = ColumnSpec>) -> Result<Self> {
        let mut map: IndexMap<String, ColumnSpec> = IndexMap::new();

        for (position, column) in columns.into_iter().enumerate() {
            if column.accessor.is_empty() {
                return Err(TabbedError::Schema(format!(
                    "column {} has an empty name",
                    position + 1
                )));
            }
            if let Some(first) = map.get_index_of(&column.accessor) {
                return Err(TabbedError::DuplicateAccessor {
                    accessor: column.accessor,
                    first: first + 1,
                    second: position + 1,
                });
            }
            map.insert(column.accessor.clone(), column);
        }

        Ok(Self { columns: map })
    }

    /// Load an explicit schema from a JSON array of column specs.
    pub fn from_json(text: &str) -> Result<Self> {
        let columns: Vec<ColumnSpec> = serde_json::from_str(text)?;
        Self::from_columns(columns)
    }

    /// Get a column by accessor name.
    pub fn get(&self, accessor: &str) -> Option<&ColumnSpec> {
        self.columns.get(accessor)
    }

    /// Zero-based position of a column.
    pub fn position(&self, accessor: &str) -> Option<usize> {
        self.columns.get_index_of(accessor)
    }

    /// Get a column by position.
    pub fn column(&self, position: usize) -> Option<&ColumnSpec> {
        self.columns.get_index(position).map(|(_, c)| c)
    }

    /// Iterate columns in order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.values()
    }

    /// Get all accessor names in column order.
    pub fn accessors(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// IndexMap equality ignores order; column order is part of a schema.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.columns.values().eq(other.columns.values())
    }
}

impl TryFrom<Vec<ColumnSpec>> for Schema {
    type Error = TabbedError;

    fn try_from(columns: Vec<ColumnSpec>) -> Result<Self> {
        Self::from_columns(columns)
    }
}

impl From<Schema> for Vec<ColumnSpec> {
    fn from(schema: Schema) -> Self {
        schema.columns.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    #[test]
    fn test_lookup_by_accessor_and_position() {
        let schema = Schema::from_columns(vec![
            ColumnSpec::tagged("s1", ColumnType::String, 1),
            ColumnSpec::tagged("f1", ColumnType::Float, 1),
        ])
        .unwrap();

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.position("f1"), Some(1));
        assert_eq!(schema.column(0).unwrap().accessor, "s1");
        assert_eq!(schema.get("f1").unwrap().column_type, ColumnType::Float);
        assert!(schema.get("i1").is_none());
    }

    #[test]
    fn test_duplicate_accessor_rejected() {
        let err = Schema::from_columns(vec![
            ColumnSpec::new("score", ColumnType::Float),
            ColumnSpec::new("score", ColumnType::Integer),
        ])
        .unwrap_err();

        match err {
            TabbedError::DuplicateAccessor { accessor, first, second } => {
                assert_eq!(accessor, "score");
                assert_eq!((first, second), (1, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let schema = Schema::from_columns(vec![
            ColumnSpec::new("gene", ColumnType::String),
            ColumnSpec::tagged("i1", ColumnType::Integer, 1),
        ])
        .unwrap();

        let json = serde_json::to_string(&schema).unwrap();
        let back = Schema::from_json(&json).unwrap();
        assert_eq!(schema, back);
    }

    #[test]
    fn test_json_duplicates_rejected() {
        let json = r#"[
            {"name": "a", "column_type": "string", "accessor": "x"},
            {"name": "b", "column_type": "float", "accessor": "x"}
        ]"#;
        assert!(matches!(
            Schema::from_json(json),
            Err(TabbedError::DuplicateAccessor { .. })
        ));
    }
}
