// SPDX-License-Identifier: Apache-2.0

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::iter::FusedIterator;

use log::{debug, trace, warn};

use crate::event::Event;
use crate::event_buffer::EventBuffer;
use crate::json_number::JsonNumber;
use crate::options::ParserOptions;
use crate::parse_error::ParseError;
use crate::string_decoder::StringDecoder;
use crate::tokenizer::{ErrKind, RawEvent, TokenParser, Tokenizer};

/// Trait for input sources that can provide data to the streaming parser.
pub trait Reader {
    /// The error type returned by read operations
    type Error: core::fmt::Display;

    /// Read data into the provided buffer.
    /// Returns the number of bytes read, or an error.
    ///
    /// # Contract
    /// - A return value of 0 **MUST** indicate true end of stream
    /// - Implementations **MUST NOT** return 0 unless no more data will ever be available
    /// - Returning 0 followed by non-zero reads in subsequent calls violates this contract
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<R: Reader + ?Sized> Reader for &mut R {
    type Error = R::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}

/// Represents the processing state of the StreamParser
/// Enforces logical invariants: once Finished or Failed, no other processing states are possible
#[derive(Debug)]
enum ProcessingState {
    /// More input may follow
    Active,
    /// End of stream reached and the document is complete
    Finished,
    /// The session ended with an error, reported on every later call
    Failed(ParseError),
}

/// Converts raw tokenizer elements into events as they are reported.
///
/// The first conversion failure is kept and everything reported after it is
/// dropped, so the buffer holds exactly the events that precede the error.
struct EventSink<'a> {
    buffer: &'a mut EventBuffer,
    error: Option<ParseError>,
}

impl<'a> EventSink<'a> {
    fn new(buffer: &'a mut EventBuffer) -> Self {
        Self {
            buffer,
            error: None,
        }
    }

    fn accept(&mut self, raw: RawEvent, pos: usize) {
        if self.error.is_some() {
            return;
        }
        match Self::convert(raw, pos) {
            Ok(event) => self.buffer.push(event),
            Err(err) => self.error = Some(err),
        }
    }

    fn convert(raw: RawEvent, pos: usize) -> Result<Event, ParseError> {
        let invalid_number = |_| ParseError::MalformedInput {
            kind: ErrKind::InvalidNumber,
            offset: pos,
        };
        Ok(match raw {
            RawEvent::ArrayStart => Event::StartArray,
            RawEvent::ArrayEnd => Event::EndArray,
            RawEvent::MapStart => Event::StartMap,
            RawEvent::MapEnd => Event::EndMap,
            RawEvent::MapKey(raw) => Event::MapKey(StringDecoder::decode(raw, pos)?),
            RawEvent::String(raw) => Event::String(StringDecoder::decode(raw, pos)?),
            RawEvent::Integer(text) => {
                Event::Number(JsonNumber::from_integer_literal(&text).map_err(invalid_number)?)
            }
            RawEvent::Float(text) => {
                Event::Number(JsonNumber::from_float_literal(&text).map_err(invalid_number)?)
            }
            RawEvent::Boolean(value) => Event::Boolean(value),
            RawEvent::Null => Event::Null,
        })
    }
}

/// A pull parser over a chunked byte stream.
///
/// Each call to [`next_event`](StreamParser::next_event) hands out one
/// buffered event. When the buffer is empty the parser reads the next chunk
/// from its [`Reader`], feeds it to the [`TokenParser`] and buffers whatever
/// that chunk completes. Input is read lazily and only as far as needed.
///
/// # Example
///
/// ```rust
/// use shjson::{ChunkReader, Event, StreamParser};
///
/// let reader = ChunkReader::new(br#"{"a": [true, null]}"#, 4);
/// let mut parser = StreamParser::new(reader);
///
/// assert_eq!(parser.next_event().unwrap(), Some(Event::StartMap));
/// assert_eq!(parser.next_event().unwrap(), Some(Event::MapKey("a".into())));
/// assert_eq!(parser.next_event().unwrap(), Some(Event::StartArray));
/// ```
pub struct StreamParser<R: Reader, T: TokenParser = Tokenizer> {
    /// Reader for streaming input
    reader: R,
    /// The grammar engine the chunks are fed to
    token_parser: T,
    /// Events produced by the last feed step and not yet returned
    buffer: EventBuffer,
    /// Chunk storage, sized to the configured read size
    read_buf: Vec<u8>,
    processing_state: ProcessingState,
    /// Set once the iterator has yielded its end or its error
    iter_done: bool,
}

impl<R: Reader> StreamParser<R> {
    /// Creates a parser with the default [`ParserOptions`].
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParserOptions::default())
    }

    pub fn with_options(reader: R, options: ParserOptions) -> Self {
        let tokenizer = Tokenizer::with_max_depth(options.max_depth);
        Self::with_token_parser(reader, options, tokenizer)
    }
}

impl<R: Reader, T: TokenParser> StreamParser<R, T> {
    /// Creates a parser driving a custom grammar engine.
    ///
    /// `options.max_depth` is not applied here; nesting limits are the
    /// engine's own business.
    pub fn with_token_parser(reader: R, options: ParserOptions, token_parser: T) -> Self {
        let read_size = options.effective_read_size();
        debug!("New StreamParser with read size {}", read_size);
        Self {
            reader,
            token_parser,
            buffer: EventBuffer::new(),
            read_buf: vec![0; read_size],
            processing_state: ProcessingState::Active,
            iter_done: false,
        }
    }

    /// Returns the next event.
    ///
    /// `Ok(None)` means the document is complete and the stream is exhausted;
    /// it is returned again on every later call. An error ends the session:
    /// events that were completed before it are still returned first, then
    /// the same error is returned from every later call without reading
    /// further input.
    pub fn next_event(&mut self) -> Result<Option<Event>, ParseError> {
        loop {
            if let Some(event) = self.buffer.pop_front() {
                return Ok(Some(event));
            }
            match &self.processing_state {
                ProcessingState::Failed(err) => return Err(err.clone()),
                ProcessingState::Finished => return Ok(None),
                ProcessingState::Active => self.fill_buffer(),
            }
        }
    }

    /// Total number of bytes fed to the grammar engine so far.
    pub fn bytes_consumed(&self) -> usize {
        self.token_parser.offset()
    }

    /// Reads one chunk and feeds it, or finishes the engine at end of stream.
    /// Leaves the state `Finished` or `Failed` when the session is over.
    fn fill_buffer(&mut self) {
        let available = self.read_buf.len();
        let len = match self.reader.read(&mut self.read_buf) {
            Ok(len) if len > available => {
                self.fail(ParseError::Reader(
                    "reader reported more bytes than requested".to_string(),
                ));
                return;
            }
            Ok(len) => len,
            Err(err) => {
                self.fail(ParseError::Reader(err.to_string()));
                return;
            }
        };

        let mut sink = EventSink::new(&mut self.buffer);
        let mut accept = |raw: RawEvent, pos: usize| sink.accept(raw, pos);
        let result = match self.read_buf.get(..len) {
            Some(chunk) if !chunk.is_empty() => {
                Self::feed_all(&mut self.token_parser, chunk, &mut accept).map(|()| false)
            }
            _ => self
                .token_parser
                .finish(&mut accept)
                .map(|()| true)
                .map_err(ParseError::from),
        };
        let conversion_error = sink.error.take();

        trace!(
            "Fed {} bytes, {} events buffered",
            len,
            self.buffer.len()
        );

        match (conversion_error, result) {
            (Some(err), _) => self.fail(err),
            (None, Err(err)) => self.fail(err),
            (None, Ok(true)) => {
                debug!(
                    "End of stream after {} bytes",
                    self.token_parser.offset()
                );
                self.processing_state = ProcessingState::Finished;
            }
            (None, Ok(false)) => {}
        }
    }

    /// Feeds `chunk` until the engine has consumed all of it.
    fn feed_all(
        token_parser: &mut T,
        mut chunk: &[u8],
        sink: &mut dyn FnMut(RawEvent, usize),
    ) -> Result<(), ParseError> {
        while !chunk.is_empty() {
            let consumed = token_parser.feed(chunk, sink)?;
            if consumed == 0 {
                return Err(ParseError::Internal("grammar engine made no progress"));
            }
            chunk = chunk.get(consumed..).ok_or(ParseError::Internal(
                "grammar engine consumed more than it was given",
            ))?;
        }
        Ok(())
    }

    fn fail(&mut self, err: ParseError) {
        warn!("Parse failed: {}", err);
        self.processing_state = ProcessingState::Failed(err);
    }
}

impl<R: Reader, T: TokenParser> Iterator for StreamParser<R, T> {
    type Item = Result<Event, ParseError>;

    /// Yields each event, then `None`. An error is yielded once, after which
    /// the iterator is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        if self.iter_done {
            return None;
        }
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.iter_done = true;
                None
            }
            Err(err) => {
                self.iter_done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: Reader, T: TokenParser> FusedIterator for StreamParser<R, T> {}
