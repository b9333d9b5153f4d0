//! Reader configuration.

use crate::error::{Result, TabbedError};
use crate::schema::{OrdinalRule, Schema};

/// Reader configuration.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Column separator.
    pub delimiter: u8,
    /// Whether the first line is a schema header.
    pub has_header: bool,
    /// Whether to silently skip empty lines.
    pub skip_blank_lines: bool,
    /// Explicit schema, used instead of inferring one from the header.
    pub schema: Option<Schema>,
    /// How header tokens get their ordinals.
    pub ordinal_rule: OrdinalRule,
    /// Quote character (None = fields are never quoted).
    pub quote: Option<u8>,
    /// Lines starting with this byte are skipped (None = no comments).
    pub comment: Option<u8>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            has_header: true,
            skip_blank_lines: true,
            schema: None,
            ordinal_rule: OrdinalRule::Declared,
            quote: None,
            comment: None,
        }
    }
}

impl ReaderOptions {
    /// Options for a file without a header, typed by an explicit schema.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            has_header: false,
            schema: Some(schema),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_byte("delimiter", self.delimiter)?;
        if let Some(quote) = self.quote {
            check_byte("quote", quote)?;
            if quote == self.delimiter {
                return Err(TabbedError::InvalidDelimiter(format!(
                    "quote and delimiter are both {:?}",
                    quote as char
                )));
            }
        }
        if let Some(comment) = self.comment {
            check_byte("comment", comment)?;
        }
        Ok(())
    }
}

fn check_byte(what: &str, byte: u8) -> Result<()> {
    if !byte.is_ascii() || byte == b'\n' || byte == b'\r' {
        return Err(TabbedError::InvalidDelimiter(format!(
            "{} must be a single ASCII character other than a line break, got 0x{:02x}",
            what, byte
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReaderOptions::default();
        assert_eq!(options.delimiter, b'\t');
        assert!(options.has_header);
        assert!(options.skip_blank_lines);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_bytes() {
        for delimiter in [b'\n', b'\r', 0xE9] {
            let options = ReaderOptions { delimiter, ..Default::default() };
            assert!(matches!(options.validate(), Err(TabbedError::InvalidDelimiter(_))));
        }

        let options = ReaderOptions {
            delimiter: b',',
            quote: Some(b','),
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }
}
