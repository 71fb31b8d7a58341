//! Line parser for the `<label> <value>` input format.
//!
//! Only the space character separates fields. Surrounding whitespace of any
//! kind is trimmed first, runs of spaces between the label and the value are
//! tolerated and anything after the value is ignored.

use crate::record::{Record, Score};

/// Why a line did not produce a record.
///
/// Rejections are expected on real input and are never fatal: callers skip
/// the line and keep reading.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineRejection {
    #[error("line is empty")]
    Blank,
    #[error("no value token after label")]
    MissingValue,
    #[error("value `{0}` is not a 64-bit integer")]
    InvalidValue(String),
}

/// Parse one raw input line into a [`Record`].
pub fn parse_line(line: &str) -> Result<Record, LineRejection> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(LineRejection::Blank);
    }

    let mut tokens = trimmed.split(' ');
    let label = match tokens.next() {
        Some(label) if !label.is_empty() => label,
        _ => return Err(LineRejection::Blank),
    };
    let value = tokens
        .find(|token| !token.is_empty())
        .ok_or(LineRejection::MissingValue)?;

    let value = value
        .parse::<Score>()
        .map_err(|_| LineRejection::InvalidValue(value.to_string()))?;

    Ok(Record::new(label, value))
}
