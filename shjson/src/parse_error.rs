// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use crate::tokenizer::{ErrKind, TokenError};

/// Errors that end a parse session.
///
/// Every variant is terminal: once a [`StreamParser`](crate::StreamParser)
/// reports one, it keeps reporting it and reads no further input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The input violates the JSON grammar.
    #[error("malformed input at byte {offset}: {kind}")]
    MalformedInput { kind: ErrKind, offset: usize },
    /// The stream ended inside an incomplete construct, or before any value.
    #[error("input ended prematurely at byte {offset}")]
    PrematureEnd { offset: usize },
    /// A string literal does not decode to valid text. `offset` points at
    /// the opening quote.
    #[error("invalid string starting at byte {offset}: {kind}")]
    DecodeError { kind: DecodeErrorKind, offset: usize },
    /// Error from the underlying reader (I/O error, not end-of-stream)
    #[error("reader error: {0}")]
    Reader(String),
    /// The grammar engine broke its contract, e.g. by consuming nothing
    /// from a non-empty chunk.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

/// Why a string literal could not be decoded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(core::str::Utf8Error),
    #[error("unpaired high surrogate \\u{0:04X}")]
    UnpairedHighSurrogate(u16),
    #[error("unpaired low surrogate \\u{0:04X}")]
    UnpairedLowSurrogate(u16),
}

impl ParseError {
    /// Byte offset the error refers to, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::MalformedInput { offset, .. }
            | ParseError::PrematureEnd { offset }
            | ParseError::DecodeError { offset, .. } => Some(*offset),
            ParseError::Reader(_) | ParseError::Internal(_) => None,
        }
    }
}

impl From<TokenError> for ParseError {
    fn from(err: TokenError) -> Self {
        if err.is_premature_end() {
            ParseError::PrematureEnd {
                offset: err.position(),
            }
        } else {
            ParseError::MalformedInput {
                kind: err.kind(),
                offset: err.position(),
            }
        }
    }
}
