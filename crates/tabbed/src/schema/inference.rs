//! Header-driven schema inference.
//!
//! Header tokens name their column's type with a leading tag character
//! (`s` string, `i` integer, `f` float) followed by a number, e.g. `s1`,
//! `i2`, `f1`. Tokens that do not follow the convention become opaque string
//! columns named after the lower-cased token.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::column::ColumnSpec;
use super::table::Schema;
use super::types::ColumnType;
use crate::error::{Result, TabbedError};

static TAGGED_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^([sif])(\d*)$").unwrap());

/// How a tagged header token gets its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdinalRule {
    /// Use the number written in the token: `i2` is ordinal 2.
    #[default]
    Declared,
    /// Number each tag by its occurrences in the header, left to right.
    /// Written numbers are ignored, and a bare `s`, `i` or `f` is accepted.
    TagOrder,
}

/// Derive a schema from a header line using [`OrdinalRule::Declared`].
pub fn derive_schema(header_line: &str, delimiter: u8) -> Result<Schema> {
    derive_schema_with(header_line, delimiter, OrdinalRule::Declared)
}

/// Derive a schema from a header line.
pub fn derive_schema_with(header_line: &str, delimiter: u8, rule: OrdinalRule) -> Result<Schema> {
    let line = header_line
        .strip_prefix('\u{feff}')
        .unwrap_or(header_line)
        .trim_end_matches(['\n', '\r']);

    schema_from_tokens(line.split(delimiter as char), rule)
}

/// Build a schema from already split header tokens.
pub fn schema_from_tokens<'a>(
    tokens: impl IntoIterator<Item = &'a str>,
    rule: OrdinalRule,
) -> Result<Schema> {
    let mut seen: HashMap<ColumnType, u32> = HashMap::new();
    let mut columns = Vec::new();

    for (position, raw) in tokens.into_iter().enumerate() {
        let token = raw.trim();
        if token.is_empty() {
            return Err(TabbedError::Schema(format!(
                "header column {} is empty",
                position + 1
            )));
        }
        columns.push(classify(token, rule, &mut seen));
    }

    if columns.is_empty() {
        return Err(TabbedError::Schema("header has no columns".to_string()));
    }

    Schema::from_columns(columns)
}

/// Schema for a file without a header: `width` string columns `s1..sN`.
pub fn untyped_schema(width: usize) -> Result<Schema> {
    let columns = (1..=width).map(|n| {
        let ordinal = u32::try_from(n).unwrap_or(u32::MAX);
        ColumnSpec::tagged(format!("s{}", n), ColumnType::String, ordinal)
    });
    Schema::from_columns(columns)
}

fn classify(token: &str, rule: OrdinalRule, seen: &mut HashMap<ColumnType, u32>) -> ColumnSpec {
    let Some(caps) = TAGGED_TOKEN.captures(token) else {
        return ColumnSpec::opaque(token);
    };

    let tag = caps[1].chars().next().and_then(ColumnType::from_tag);
    let digits = &caps[2];

    match (tag, rule) {
        (Some(column_type), OrdinalRule::Declared) => match digits.parse::<u32>() {
            Ok(ordinal) if ordinal > 0 => ColumnSpec::tagged(token, column_type, ordinal),
            _ => ColumnSpec::opaque(token),
        },
        (Some(column_type), OrdinalRule::TagOrder) => {
            let count = seen.entry(column_type).or_insert(0);
            *count += 1;
            ColumnSpec::tagged(token, column_type, *count)
        }
        (None, _) => ColumnSpec::opaque(token),
    }
}
