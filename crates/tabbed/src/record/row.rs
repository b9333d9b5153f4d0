//! The base record: one coerced row.

use std::sync::Arc;

use serde::de::value::{Error as DeError, MapAccessDeserializer, MapDeserializer};
use serde::de::{Deserialize, DeserializeOwned};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Result, TabbedError};
use crate::schema::{ColumnSpec, ColumnType, Schema, Value};

/// One parsed row: a coerced value per schema column.
///
/// The schema is shared with every other row from the same file. A row keeps
/// no reference to the reader that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Row {
    /// Coerce raw fields against a schema.
    ///
    /// Errors from rows built outside a reader carry line 0.
    pub fn new<S: AsRef<str>>(schema: Arc<Schema>, fields: &[S]) -> Result<Self> {
        if fields.len() != schema.len() {
            return Err(TabbedError::RowShape {
                line: 0,
                expected: schema.len(),
                actual: fields.len(),
            });
        }

        let values = schema
            .columns()
            .zip(fields)
            .map(|(column, raw)| coerce(raw.as_ref(), column))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { schema, values })
    }

    /// Build a row from values that are already typed.
    pub fn from_values(schema: Arc<Schema>, values: Vec<Value>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(TabbedError::RowShape {
                line: 0,
                expected: schema.len(),
                actual: values.len(),
            });
        }
        for (column, value) in schema.columns().zip(&values) {
            if value.column_type() != column.column_type {
                return Err(TabbedError::FieldType {
                    accessor: column.accessor.clone(),
                    expected: column.column_type,
                    actual: value.column_type(),
                });
            }
        }
        Ok(Self { schema, values })
    }

    /// The schema this row was coerced against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The shared schema handle.
    pub fn schema_arc(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Values in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Split the row into its schema and values.
    pub fn into_parts(self) -> (Arc<Schema>, Vec<Value>) {
        (self.schema, self.values)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by accessor name.
    pub fn get(&self, accessor: &str) -> Option<&Value> {
        self.schema.position(accessor).map(|i| &self.values[i])
    }

    /// Iterate `(accessor, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .columns()
            .map(|c| c.accessor.as_str())
            .zip(self.values.iter())
    }

    /// Read a string field.
    pub fn get_str(&self, accessor: &str) -> Result<&str> {
        let value = self.lookup(accessor)?;
        value
            .as_str()
            .ok_or_else(|| mismatch(accessor, ColumnType::String, value))
    }

    /// Read an integer field.
    pub fn get_int(&self, accessor: &str) -> Result<i64> {
        let value = self.lookup(accessor)?;
        value
            .as_int()
            .ok_or_else(|| mismatch(accessor, ColumnType::Integer, value))
    }

    /// Read a float field.
    pub fn get_float(&self, accessor: &str) -> Result<f64> {
        let value = self.lookup(accessor)?;
        value
            .as_float()
            .ok_or_else(|| mismatch(accessor, ColumnType::Float, value))
    }

    /// Convert this row into a statically typed struct keyed by accessor names.
    ///
    /// Values are handed over directly, so non-finite floats are preserved.
    /// Failures are record errors.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let mut entries: MapDeserializer<'_, _, DeError> =
            MapDeserializer::new(self.iter().map(|(accessor, value)| (accessor, value.clone())));
        let record = T::deserialize(MapAccessDeserializer::new(&mut entries)).map_err(record_error)?;
        entries.end().map_err(record_error)?;
        Ok(record)
    }

    fn lookup(&self, accessor: &str) -> Result<&Value> {
        self.get(accessor)
            .ok_or_else(|| TabbedError::UnknownField(accessor.to_string()))
    }
}

fn record_error(e: DeError) -> TabbedError {
    TabbedError::Record {
        line: 0,
        message: e.to_string(),
    }
}

fn mismatch(accessor: &str, expected: ColumnType, value: &Value) -> TabbedError {
    TabbedError::FieldType {
        accessor: accessor.to_string(),
        expected,
        actual: value.column_type(),
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (accessor, value) in self.iter() {
            map.serialize_entry(accessor, value)?;
        }
        map.end()
    }
}

/// Convert one raw field to its column's type.
pub fn coerce(raw: &str, column: &ColumnSpec) -> Result<Value> {
    let type_error = |reason: String| TabbedError::TypeCoercion {
        line: 0,
        accessor: column.accessor.clone(),
        expected: column.column_type,
        value: raw.to_string(),
        reason,
    };

    match column.column_type {
        ColumnType::String => Ok(Value::String(raw.to_string())),
        ColumnType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| type_error(e.to_string())),
        ColumnType::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| type_error(e.to_string())),
    }
}
