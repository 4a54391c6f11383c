// SPDX-License-Identifier: Apache-2.0

//! Incremental, event-based JSON parsing over chunked byte streams.
//!
//! A [`StreamParser`] pulls bytes from a [`Reader`] on demand, feeds them to
//! a push-style [`TokenParser`], and hands out the resulting [`Event`]s one
//! at a time. Documents of any size can be processed with memory bounded by
//! the read size and the largest single string or number.
//!
//! ```rust
//! use shjson::{parse_slice, Event, JsonNumber};
//!
//! let events: Result<Vec<Event>, _> = parse_slice(br#"[null, 1.5, "x"]"#).collect();
//! assert_eq!(
//!     events.unwrap(),
//!     [
//!         Event::StartArray,
//!         Event::Null,
//!         Event::Number(JsonNumber::Float(1.5)),
//!         Event::String("x".into()),
//!         Event::EndArray,
//!     ]
//! );
//! ```
//!
//! Integers are kept exact at any length, and numbers with a fraction or an
//! exponent become `f64`. See [`JsonNumber`].

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod chunk_reader;
pub use chunk_reader::ChunkReader;
#[cfg(feature = "std")]
pub use chunk_reader::IoReader;

mod event;
pub use event::{Event, EventKind};

mod event_buffer;
pub use event_buffer::EventBuffer;

mod json_number;
pub use json_number::{JsonNumber, NumberError};

mod options;
pub use options::{ParserOptions, DEFAULT_READ_SIZE};

mod parse_error;
pub use parse_error::{DecodeErrorKind, ParseError};

mod stream_parser;
pub use stream_parser::{Reader, StreamParser};

mod string_decoder;
pub use string_decoder::{Fragment, RawString, StringDecoder};

mod tokenizer;
pub use tokenizer::{
    ErrKind, RawEvent, TokenError, TokenParser, Tokenizer, DEFAULT_MAX_DEPTH,
};

/// Starts a lazy parse of `reader` with default options.
///
/// Nothing is read until the first event is requested.
pub fn basic_parse<R: Reader>(reader: R) -> StreamParser<R> {
    StreamParser::new(reader)
}

/// Parses an in-memory document.
pub fn parse_slice(data: &[u8]) -> StreamParser<ChunkReader<'_>> {
    StreamParser::new(ChunkReader::full_slice(data))
}
