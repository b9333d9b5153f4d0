//! Tabbed: typed records over delimiter-separated files.
//!
//! The header line declares each column's type with a tag character and a
//! number: `s1` is the first string column, `i2` the second integer column,
//! `f1` the first float column. Every data row is coerced once, when it is
//! read, into a [`Row`] whose fields are looked up by those accessor names.
//!
//! # Example
//!
//! ```no_run
//! use tabbed::{ReaderOptions, TabbedFile};
//!
//! let file = TabbedFile::open("scores.tsv", ReaderOptions::default()).unwrap();
//! println!("Columns: {:?}", file.schema().accessors());
//!
//! for record in file {
//!     match record {
//!         Ok(row) => println!("{} = {}", row.get_str("s1").unwrap(), row.get_int("i1").unwrap()),
//!         Err(e) => eprintln!("skipping: {}", e),
//!     }
//! }
//! ```
//!
//! # Extending records
//!
//! Wrap a [`Row`] in your own type, implement [`Record`] and [`FromRow`],
//! and open the file with [`TabbedFile::open_as`]. Computed methods return
//! [`Computed`] values, which are absent instead of failing.

pub mod error;
pub mod input;
pub mod record;
pub mod schema;

pub use error::{ErrorCategory, Result, TabbedError};
pub use input::{ReaderOptions, TabbedFile};
pub use record::{ComputeError, Computed, FromRow, Record, Row, checked_div, checked_powf, compute};
pub use schema::{
    ColumnSpec, ColumnType, OrdinalRule, Schema, Value, derive_schema, derive_schema_with,
};
