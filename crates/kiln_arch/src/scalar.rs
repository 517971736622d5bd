//! Typed readers for statement operands.
//!
//! Each reader consumes tokens from a [`LineCursor`] and checks the value
//! against the bounds of the field it belongs to. Statement readers call
//! [`expect_end`] once every operand has been read.

use crate::error::ArchError;
use crate::field::Field;
use crate::lexer::{LineCursor, Token};
use crate::types::Keyword;
use std::fmt;

/// A half-open `(low, high]` bound on a float operand.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FloatRange {
    /// Exclusive lower bound.
    pub low: f64,
    /// Inclusive upper bound.
    pub high: f64,
}

impl FloatRange {
    const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Returns `true` if `value` lies in `(low, high]`. NaN never does.
    pub fn contains(&self, value: f64) -> bool {
        value > self.low && value <= self.high
    }
}

impl fmt::Display for FloatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a value in ({}, {}]", self.low, self.high)
    }
}

/// `chan_width_io`.
pub const CHAN_WIDTH_IO: FloatRange = FloatRange::new(0.0, 5000.0);
/// `Fc_output`, `Fc_input`, `Fc_pad`.
pub const FC: FloatRange = FloatRange::new(0.0, 1e20);
/// Peak of a uniform distribution.
pub const UNIFORM_PEAK: FloatRange = FloatRange::new(0.0, 1.0);
/// Peak of a gaussian or pulse distribution.
pub const SHAPED_PEAK: FloatRange = FloatRange::new(-1.0, 1.0);
/// Peak of a delta distribution.
pub const DELTA_PEAK: FloatRange = FloatRange::new(-1e5, 1e5);
/// Width of a gaussian or pulse distribution.
pub const WIDTH: FloatRange = FloatRange::new(0.0, 1e10);
/// `xpeak` and `dc`; the lower bound admits an exact zero.
pub const FRACTION: FloatRange = FloatRange::new(-1e-30, 1.0);

/// Takes the next operand or fails with [`ArchError::MissingValue`].
pub fn require<'a, 'src>(
    cursor: &mut LineCursor<'a, 'src>,
    field: Field,
    expected: &'static str,
) -> Result<&'a Token<'src>, ArchError> {
    let end = cursor.end_span();
    let line = cursor.last().line;
    cursor.next().ok_or(ArchError::MissingValue {
        field,
        expected,
        line,
        span: end,
    })
}

/// Fails with [`ArchError::TrailingTokens`] if any operand is left.
pub fn expect_end(cursor: &LineCursor<'_, '_>, field: Field) -> Result<(), ArchError> {
    match cursor.peek() {
        None => Ok(()),
        Some(tok) => Err(ArchError::TrailingTokens {
            field,
            text: tok.text.to_string(),
            line: tok.line,
            span: tok.span,
        }),
    }
}

/// Reads a strictly positive integer.
pub fn parse_int(cursor: &mut LineCursor<'_, '_>, field: Field) -> Result<u32, ArchError> {
    let tok = require(cursor, field, "an integer value")?;
    let value: i64 = tok.text.parse().map_err(|_| invalid_number(tok, field))?;
    if value <= 0 || value > i64::from(u32::MAX) {
        let expected = if value <= 0 {
            "an integer > 0".to_string()
        } else {
            format!("an integer in 1..={}", u32::MAX)
        };
        return Err(ArchError::OutOfRange {
            field,
            text: tok.text.to_string(),
            expected,
            line: tok.line,
            span: tok.span,
        });
    }
    log::trace!("{field} = {value}");
    Ok(value as u32)
}

/// Reads a float in `range`.
pub fn parse_float(
    cursor: &mut LineCursor<'_, '_>,
    field: Field,
    what: &'static str,
    range: FloatRange,
) -> Result<f64, ArchError> {
    let tok = require(cursor, field, what)?;
    let value: f64 = tok.text.parse().map_err(|_| invalid_number(tok, field))?;
    if !range.contains(value) {
        return Err(ArchError::OutOfRange {
            field,
            text: tok.text.to_string(),
            expected: format!("{what} in ({}, {}]", range.low, range.high),
            line: tok.line,
            span: tok.span,
        });
    }
    log::trace!("{field} {what} = {value}");
    Ok(value)
}

/// Reads one of the keywords of `K`.
pub fn parse_keyword<K: Keyword>(
    cursor: &mut LineCursor<'_, '_>,
    field: Field,
) -> Result<K, ArchError> {
    let tok = require(cursor, field, "a keyword")?;
    K::from_keyword(tok.text).ok_or_else(|| ArchError::UnknownKeyword {
        field,
        text: tok.text.to_string(),
        expected: K::expected(),
        line: tok.line,
        span: tok.span,
    })
}

/// Reads `class: <id>` and returns the ID with the token it came from.
pub fn parse_class_id<'a, 'src>(
    cursor: &mut LineCursor<'a, 'src>,
    field: Field,
) -> Result<(u32, &'a Token<'src>), ArchError> {
    let marker = require(cursor, field, "the `class:` keyword")?;
    if marker.text != "class:" {
        return Err(ArchError::UnknownKeyword {
            field,
            text: marker.text.to_string(),
            expected: "class:".to_string(),
            line: marker.line,
            span: marker.span,
        });
    }
    let tok = require(cursor, field, "a class number")?;
    let value: i64 = tok.text.parse().map_err(|_| invalid_number(tok, field))?;
    if value < 0 || value > i64::from(u32::MAX) {
        return Err(ArchError::OutOfRange {
            field,
            text: tok.text.to_string(),
            expected: "a class number >= 0".to_string(),
            line: tok.line,
            span: tok.span,
        });
    }
    Ok((value as u32, tok))
}

fn invalid_number(tok: &Token<'_>, field: Field) -> ArchError {
    ArchError::InvalidNumber {
        field,
        text: tok.text.to_string(),
        line: tok.line,
        span: tok.span,
    }
}
