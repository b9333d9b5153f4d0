//! Record capability traits.

use crate::error::Result;
use crate::schema::{Schema, Value};

use super::row::Row;

/// Typed field access shared by every record type.
///
/// Implement this on a type that wraps a [`Row`] to give it the same field
/// access, then add computed methods on top:
///
/// ```
/// use tabbed::{Computed, FromRow, Record, Result, Row, checked_powf, compute};
///
/// struct Hit(Row);
///
/// impl Record for Hit {
///     fn row(&self) -> &Row {
///         &self.0
///     }
/// }
///
/// impl FromRow for Hit {
///     fn from_row(row: Row) -> Result<Self> {
///         Ok(Hit(row))
///     }
/// }
///
/// impl Hit {
///     fn weighted(&self) -> Computed<f64> {
///         compute(|| checked_powf(self.get_float("f1")?, self.get_int("i1")? as f64))
///     }
/// }
/// ```
pub trait Record {
    /// The underlying coerced row.
    fn row(&self) -> &Row;

    fn schema(&self) -> &Schema {
        self.row().schema()
    }

    fn get(&self, accessor: &str) -> Option<&Value> {
        self.row().get(accessor)
    }

    fn get_str(&self, accessor: &str) -> Result<&str> {
        self.row().get_str(accessor)
    }

    fn get_int(&self, accessor: &str) -> Result<i64> {
        self.row().get_int(accessor)
    }

    fn get_float(&self, accessor: &str) -> Result<f64> {
        self.row().get_float(accessor)
    }
}

impl Record for Row {
    fn row(&self) -> &Row {
        self
    }
}

/// Build a record type from a coerced row.
///
/// Used by [`TabbedFile::open_as`](crate::TabbedFile::open_as) as the
/// record-construction strategy.
pub trait FromRow: Sized {
    fn from_row(row: Row) -> Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: Row) -> Result<Self> {
        Ok(row)
    }
}
