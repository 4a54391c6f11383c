// SPDX-License-Identifier: Apache-2.0

use alloc::string::ToString;
use core::str::FromStr;

use num_bigint::BigInt;

/// A JSON number, classified by its literal syntax.
///
/// Literals without a fraction or exponent are integers and are kept exact at
/// any length. Everything else is an IEEE-754 double, rounded to nearest;
/// precision beyond what a double holds is dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNumber {
    Integer(BigInt),
    Float(f64),
}

/// The literal text is not a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid number literal")]
pub struct NumberError;

impl JsonNumber {
    /// Builds a number from literal text, choosing integer or float from the
    /// syntax alone (never from magnitude).
    pub fn from_literal(literal: &str) -> Result<Self, NumberError> {
        if is_integer(literal.as_bytes()) {
            Self::from_integer_literal(literal)
        } else {
            Self::from_float_literal(literal)
        }
    }

    /// Parses an integer literal exactly.
    pub fn from_integer_literal(literal: &str) -> Result<Self, NumberError> {
        if !is_json_integer(literal.as_bytes()) {
            return Err(NumberError);
        }
        BigInt::from_str(literal)
            .map(JsonNumber::Integer)
            .map_err(|_| NumberError)
    }

    /// Parses a literal with a fraction and/or exponent as an `f64`.
    ///
    /// A magnitude beyond `f64::MAX` yields an infinite value.
    pub fn from_float_literal(literal: &str) -> Result<Self, NumberError> {
        if !is_json_float(literal.as_bytes()) {
            return Err(NumberError);
        }
        f64::from_str(literal)
            .map(JsonNumber::Float)
            .map_err(|_| NumberError)
    }

    /// Check if this number came from an integer literal.
    pub fn is_integer(&self) -> bool {
        matches!(self, JsonNumber::Integer(_))
    }

    /// Returns true if this number came from a literal with a fraction or exponent.
    pub fn is_float(&self) -> bool {
        !self.is_integer()
    }

    /// The exact integer value, if this is an integer.
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            JsonNumber::Integer(value) => Some(value),
            JsonNumber::Float(_) => None,
        }
    }

    /// The integer value if it fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_bigint().and_then(|value| i64::try_from(value).ok())
    }

    /// The integer value if it fits in a `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_bigint().and_then(|value| u64::try_from(value).ok())
    }

    /// The value as an `f64`. Integers are rounded to the nearest double.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonNumber::Float(value) => Some(*value),
            JsonNumber::Integer(value) => match i64::try_from(value) {
                // exact below 2^53, correctly rounded above via the decimal text
                Ok(small) if small.unsigned_abs() < (1 << 53) => Some(small as f64),
                _ => f64::from_str(&value.to_string()).ok(),
            },
        }
    }
}

impl FromStr for JsonNumber {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_literal(s)
    }
}

impl From<i64> for JsonNumber {
    fn from(value: i64) -> Self {
        JsonNumber::Integer(BigInt::from(value))
    }
}

impl From<f64> for JsonNumber {
    fn from(value: f64) -> Self {
        JsonNumber::Float(value)
    }
}

impl core::fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            JsonNumber::Integer(value) => write!(f, "{value}"),
            JsonNumber::Float(value) => write!(f, "{value}"),
        }
    }
}

/// Detects if a number byte slice represents an integer (no decimal point or exponent).
/// JSON numbers are pure ASCII, so this avoids unnecessary UTF-8 string processing.
pub fn is_integer(bytes: &[u8]) -> bool {
    !bytes.iter().any(|&b| matches!(b, b'.' | b'e' | b'E'))
}

/// `-?(0|[1-9][0-9]*)`
fn is_json_integer(bytes: &[u8]) -> bool {
    let digits = bytes.strip_prefix(b"-").unwrap_or(bytes);
    match digits {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        _ => digits.iter().all(u8::is_ascii_digit),
    }
}

/// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`
fn is_json_float(bytes: &[u8]) -> bool {
    let mut parts = bytes.splitn(2, |&b| matches!(b, b'e' | b'E'));
    let mantissa = parts.next().unwrap_or_default();
    let exponent = parts.next();
    let mut parts = mantissa.splitn(2, |&b| b == b'.');
    let int_part = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let all_digits = |part: &[u8]| !part.is_empty() && part.iter().all(u8::is_ascii_digit);
    let exponent_ok = exponent.map_or(true, |exp| {
        let exp = exp
            .strip_prefix(b"+")
            .or_else(|| exp.strip_prefix(b"-"))
            .unwrap_or(exp);
        all_digits(exp)
    });
    is_json_integer(int_part) && fraction.map_or(true, all_digits) && exponent_ok
}
