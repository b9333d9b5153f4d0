//! Error types for the tabbed library.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::ColumnType;

/// Main error type for tabbed operations.
#[derive(Debug, Error)]
pub enum TabbedError {
    /// Error opening or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error reading from an already open stream.
    #[error("Read error at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// Header could not be turned into a valid schema.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Two header tokens resolved to the same accessor name.
    #[error("Schema error: accessor '{accessor}' used by columns {first} and {second}")]
    DuplicateAccessor {
        accessor: String,
        first: usize,
        second: usize,
    },

    /// Invalid delimiter or quote specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// A data line has the wrong number of fields.
    #[error("Row shape error at line {line}: expected {expected} fields, got {actual}")]
    RowShape {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// A field could not be converted to its column type.
    #[error("Type error at line {line}, field '{accessor}': cannot read {value:?} as {expected}: {reason}")]
    TypeCoercion {
        line: usize,
        accessor: String,
        expected: ColumnType,
        value: String,
        reason: String,
    },

    /// A data line is not valid UTF-8.
    #[error("Encoding error at line {line}: invalid UTF-8")]
    Encoding { line: usize },

    /// Error from the CSV library while splitting a quoted line.
    #[error("CSV error at line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    /// The record factory rejected a row.
    #[error("Record error at line {line}: {message}")]
    Record { line: usize, message: String },

    /// No column with this accessor name.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A field was read as the wrong type.
    #[error("Field '{accessor}' is {actual}, not {expected}")]
    FieldType {
        accessor: String,
        expected: ColumnType,
        actual: ColumnType,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Broad class of a [`TabbedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The stream could not be opened or read.
    Io,
    /// The header or an explicit schema is invalid.
    Schema,
    /// Reader options are invalid.
    Config,
    /// A row has the wrong number of fields.
    RowShape,
    /// A field's text does not fit its column type.
    TypeCoercion,
    /// A row could not be turned into a record.
    Record,
    /// A field lookup on a record failed.
    Access,
}

impl TabbedError {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TabbedError::Io { .. } | TabbedError::Read { .. } => ErrorCategory::Io,
            TabbedError::Schema(_) | TabbedError::DuplicateAccessor { .. } | TabbedError::Json(_) => {
                ErrorCategory::Schema
            }
            TabbedError::InvalidDelimiter(_) => ErrorCategory::Config,
            TabbedError::RowShape { .. } | TabbedError::Csv { .. } => ErrorCategory::RowShape,
            TabbedError::TypeCoercion { .. } | TabbedError::Encoding { .. } => {
                ErrorCategory::TypeCoercion
            }
            TabbedError::Record { .. } => ErrorCategory::Record,
            TabbedError::UnknownField(_) | TabbedError::FieldType { .. } => ErrorCategory::Access,
        }
    }

    /// Whether this error concerns a single row, so iteration can go on.
    pub fn is_row_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RowShape | ErrorCategory::TypeCoercion | ErrorCategory::Record
        )
    }

    /// Line number the error was reported at, if it came from a stream.
    pub fn line(&self) -> Option<usize> {
        match self {
            TabbedError::Read { line, .. }
            | TabbedError::RowShape { line, .. }
            | TabbedError::TypeCoercion { line, .. }
            | TabbedError::Encoding { line }
            | TabbedError::Csv { line, .. }
            | TabbedError::Record { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Attach a line number to a row-level error.
    pub(crate) fn at_line(mut self, at: usize) -> Self {
        match &mut self {
            TabbedError::RowShape { line, .. }
            | TabbedError::TypeCoercion { line, .. }
            | TabbedError::Encoding { line }
            | TabbedError::Csv { line, .. }
            | TabbedError::Record { line, .. } => *line = at,
            _ => {}
        }
        self
    }
}

/// Result type alias for tabbed operations.
pub type Result<T> = std::result::Result<T, TabbedError>;
