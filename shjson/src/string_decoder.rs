// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;

use crate::parse_error::{DecodeErrorKind, ParseError};

/// One run of captured string content.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Source bytes, with simple escapes (`\n`, `\"`, ...) already resolved.
    /// Not yet validated as UTF-8.
    Bytes(Vec<u8>),
    /// A UTF-16 code unit from a `\uXXXX` escape.
    CodeUnit(u16),
}

/// String literal content as captured by the tokenizer, before decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawString {
    fragments: Vec<Fragment>,
}

impl RawString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_byte(&mut self, byte: u8) {
        match self.fragments.last_mut() {
            Some(Fragment::Bytes(run)) => run.push(byte),
            _ => self.fragments.push(Fragment::Bytes(alloc::vec![byte])),
        }
    }

    pub fn push_code_unit(&mut self, unit: u16) {
        self.fragments.push(Fragment::CodeUnit(unit));
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Turns captured string content into validated UTF-8 text.
///
/// Byte runs must already be valid UTF-8. Escaped code units are combined
/// into surrogate pairs where needed; an unpaired surrogate is an error.
pub struct StringDecoder;

impl StringDecoder {
    /// Check if a code unit is a high surrogate (0xD800-0xDBFF)
    pub fn is_high_surrogate(unit: u16) -> bool {
        (0xD800..=0xDBFF).contains(&unit)
    }

    /// Check if a code unit is a low surrogate (0xDC00-0xDFFF)
    pub fn is_low_surrogate(unit: u16) -> bool {
        (0xDC00..=0xDFFF).contains(&unit)
    }

    /// Combine a high and low surrogate pair into a single Unicode scalar value.
    pub fn combine_surrogate_pair(high: u16, low: u16) -> Option<char> {
        if !Self::is_high_surrogate(high) || !Self::is_low_surrogate(low) {
            return None;
        }
        let codepoint = 0x10000 + ((u32::from(high) & 0x3FF) << 10) + (u32::from(low) & 0x3FF);
        char::from_u32(codepoint)
    }

    /// Decodes `raw`; `offset` is the position of the opening quote and is
    /// reported on failure.
    pub fn decode(raw: RawString, offset: usize) -> Result<String, ParseError> {
        let error = |kind| ParseError::DecodeError { kind, offset };

        let mut text = String::new();
        let mut pending_high: Option<u16> = None;

        for fragment in raw.fragments {
            match fragment {
                Fragment::Bytes(bytes) => {
                    if let Some(high) = pending_high {
                        return Err(error(DecodeErrorKind::UnpairedHighSurrogate(high)));
                    }
                    let run = String::from_utf8(bytes)
                        .map_err(|e| error(DecodeErrorKind::InvalidUtf8(e.utf8_error())))?;
                    if text.is_empty() {
                        text = run;
                    } else {
                        text.push_str(&run);
                    }
                }
                Fragment::CodeUnit(unit) => {
                    if let Some(high) = pending_high.take() {
                        let ch = Self::combine_surrogate_pair(high, unit)
                            .ok_or_else(|| error(DecodeErrorKind::UnpairedHighSurrogate(high)))?;
                        text.push(ch);
                    } else if Self::is_high_surrogate(unit) {
                        pending_high = Some(unit);
                    } else {
                        // High surrogates are handled above, so only a lone
                        // low surrogate fails to map to a char here.
                        match char::from_u32(u32::from(unit)) {
                            Some(ch) => text.push(ch),
                            None => return Err(error(DecodeErrorKind::UnpairedLowSurrogate(unit))),
                        }
                    }
                }
            }
        }

        match pending_high {
            Some(high) => Err(error(DecodeErrorKind::UnpairedHighSurrogate(high))),
            None => Ok(text),
        }
    }
}
