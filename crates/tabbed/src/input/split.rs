//! Splitting a line into raw fields.

use std::borrow::Cow;

use crate::error::{Result, TabbedError};

use super::options::ReaderOptions;

/// Splits lines on the delimiter, optionally honoring quotes.
#[derive(Debug, Clone)]
pub(crate) enum Splitter {
    Plain(char),
    Quoted { delimiter: u8, quote: u8 },
}

impl Splitter {
    pub(crate) fn from_options(options: &ReaderOptions) -> Self {
        match options.quote {
            Some(quote) => Splitter::Quoted {
                delimiter: options.delimiter,
                quote,
            },
            None => Splitter::Plain(options.delimiter as char),
        }
    }

    /// Split one line, without its terminator, into fields.
    ///
    /// An empty line is a single empty field in both modes.
    pub(crate) fn split<'a>(&self, line: &'a str) -> Result<Vec<Cow<'a, str>>> {
        match *self {
            Splitter::Plain(delimiter) => Ok(line.split(delimiter).map(Cow::Borrowed).collect()),
            Splitter::Quoted { delimiter, quote } => split_quoted(line, delimiter, quote),
        }
    }
}

fn split_quoted(line: &str, delimiter: u8, quote: u8) -> Result<Vec<Cow<'_, str>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .map_err(|source| TabbedError::Csv { line: 0, source })?;

    if !found {
        return Ok(vec![Cow::Borrowed("")]);
    }
    Ok(record.iter().map(|f| Cow::Owned(f.to_string())).collect())
}
