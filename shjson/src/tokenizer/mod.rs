// SPDX-License-Identifier: Apache-2.0

//! Chunk-fed JSON grammar engine.
//!
//! The [`Tokenizer`] walks the input one byte at a time and keeps all of its
//! continuation state (grammar position, nesting stack, partially captured
//! literals) between calls, so a document can be split at any byte position.
//! Every recognized element is reported through a callback as a [`RawEvent`]
//! together with the absolute byte offset where the element starts.

use alloc::string::String;
use alloc::vec::Vec;

use crate::string_decoder::RawString;

/// Default nesting limit used by [`Tokenizer::new`].
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// One element recognized by a [`TokenParser`].
///
/// Scalars carry the captured source: numbers as their literal text, strings
/// with simple escapes resolved and `\uXXXX` escapes kept as UTF-16 code units.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    ArrayStart,
    ArrayEnd,
    MapStart,
    MapEnd,
    MapKey(RawString),
    String(RawString),
    /// Number literal without fraction or exponent.
    Integer(String),
    /// Number literal with a fraction and/or exponent.
    Float(String),
    Boolean(bool),
    Null,
}

/// A push-style grammar engine that can be driven chunk by chunk.
///
/// Implementations must produce the same callbacks regardless of how the
/// input is split between `feed` calls.
pub trait TokenParser {
    /// Advances through `chunk`, invoking `sink` once per recognized element.
    ///
    /// Returns the number of bytes of `chunk` consumed. On a grammar violation
    /// the elements recognized before the offending byte have already been
    /// reported.
    fn feed(
        &mut self,
        chunk: &[u8],
        sink: &mut dyn FnMut(RawEvent, usize),
    ) -> Result<usize, TokenError>;

    /// Signals end of input, flushing a pending root-level number.
    fn finish(&mut self, sink: &mut dyn FnMut(RawEvent, usize)) -> Result<(), TokenError>;

    /// Total number of bytes fed so far.
    fn offset(&self) -> usize;
}

/// Grammar failure reported by a [`TokenParser`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} at byte {position}")]
pub struct TokenError {
    kind: ErrKind,
    byte: Option<u8>,
    position: usize,
}

/// Classification of grammar failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    /// Input ended before any value started.
    EmptyStream,
    /// Input ended inside a value or container.
    UnfinishedStream,
    InvalidRoot,
    InvalidToken,
    UnescapedControlCharacter,
    TrailingComma,
    /// Non-whitespace after the root value.
    ContentEnded,
    UnopenedArray,
    UnopenedObject,
    MaxDepthReached,
    InvalidNumber,
    InvalidUnicodeEscape,
    InvalidStringEscape,
    ExpectedObjectKey,
    ExpectedObjectValue,
    ExpectedColon,
    ExpectedArrayItem,
    ExpectedCommaOrEnd,
}

impl ErrKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrKind::EmptyStream => "no value in input",
            ErrKind::UnfinishedStream => "input ended inside a value",
            ErrKind::InvalidRoot => "invalid root value",
            ErrKind::InvalidToken => "invalid literal",
            ErrKind::UnescapedControlCharacter => "unescaped control character in string",
            ErrKind::TrailingComma => "trailing comma",
            ErrKind::ContentEnded => "unexpected content after root value",
            ErrKind::UnopenedArray => "array closed without being opened",
            ErrKind::UnopenedObject => "object closed without being opened",
            ErrKind::MaxDepthReached => "maximum nesting depth exceeded",
            ErrKind::InvalidNumber => "invalid number",
            ErrKind::InvalidUnicodeEscape => "invalid unicode escape",
            ErrKind::InvalidStringEscape => "invalid string escape",
            ErrKind::ExpectedObjectKey => "expected object key",
            ErrKind::ExpectedObjectValue => "expected object value",
            ErrKind::ExpectedColon => "expected ':'",
            ErrKind::ExpectedArrayItem => "expected array item",
            ErrKind::ExpectedCommaOrEnd => "expected ',' or closing bracket",
        }
    }
}

impl core::fmt::Display for ErrKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TokenError {
    pub fn new<T>(kind: ErrKind, byte: Option<u8>, position: usize) -> Result<T, Self> {
        Err(Self {
            kind,
            byte,
            position,
        })
    }

    pub fn kind(&self) -> ErrKind {
        self.kind
    }

    /// The offending byte, `None` when the input ended.
    pub fn byte(&self) -> Option<u8> {
        self.byte
    }

    /// Absolute byte offset of the failure.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the failure means the input stopped too early rather than being wrong.
    pub fn is_premature_end(&self) -> bool {
        matches!(self.kind, ErrKind::EmptyStream | ErrKind::UnfinishedStream)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Container {
    Array,
    Map,
}

#[derive(Debug, Clone)]
struct ParseContext {
    stack: Vec<Container>,
    max_depth: usize,
}

impl ParseContext {
    fn new(max_depth: usize) -> Self {
        ParseContext {
            stack: Vec::new(),
            max_depth,
        }
    }

    fn enter(&mut self, container: Container, data: u8, pos: usize) -> Result<(), TokenError> {
        if self.stack.len() >= self.max_depth {
            return TokenError::new(ErrKind::MaxDepthReached, Some(data), pos);
        }
        self.stack.push(container);
        Ok(())
    }

    fn exit(&mut self, container: Container, data: u8, pos: usize) -> Result<(), TokenError> {
        match self.stack.last() {
            Some(top) if *top == container => {
                self.stack.pop();
                Ok(())
            }
            _ => {
                let kind = match container {
                    Container::Array => ErrKind::UnopenedArray,
                    Container::Map => ErrKind::UnopenedObject,
                };
                TokenError::new(kind, Some(data), pos)
            }
        }
    }

    fn top(&self) -> Option<Container> {
        self.stack.last().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// Before the root value.
    Idle,
    String { state: Str, key: bool },
    Number { state: Num },
    Literal { literal: Literal, matched: usize },
    Map { expect: Map },
    Array { expect: Array },
    /// After the root value; only whitespace may follow.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Str {
    Normal,
    Escaping,
    Unicode { digits: u8, unit: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Sign,
    LeadingZero,
    BeforeDecimalPoint,
    Decimal,
    AfterDecimalPoint,
    Exponent,
    ExponentSign,
    AfterExponent,
}

impl Num {
    fn step(self, byte: u8) -> Option<Num> {
        match (self, byte) {
            (Num::Sign, b'0') => Some(Num::LeadingZero),
            (Num::Sign, b'1'..=b'9') => Some(Num::BeforeDecimalPoint),
            (Num::LeadingZero | Num::BeforeDecimalPoint, b'.') => Some(Num::Decimal),
            (Num::BeforeDecimalPoint, b'0'..=b'9') => Some(Num::BeforeDecimalPoint),
            (Num::Decimal | Num::AfterDecimalPoint, b'0'..=b'9') => Some(Num::AfterDecimalPoint),
            (
                Num::LeadingZero | Num::BeforeDecimalPoint | Num::AfterDecimalPoint,
                b'e' | b'E',
            ) => Some(Num::Exponent),
            (Num::Exponent, b'+' | b'-') => Some(Num::ExponentSign),
            (Num::Exponent | Num::ExponentSign | Num::AfterExponent, b'0'..=b'9') => {
                Some(Num::AfterExponent)
            }
            _ => None,
        }
    }

    /// States in which the literal may legally end.
    fn is_complete(self) -> bool {
        matches!(
            self,
            Num::LeadingZero | Num::BeforeDecimalPoint | Num::AfterDecimalPoint | Num::AfterExponent
        )
    }

    /// Lexical classification: a fraction or exponent was seen.
    fn is_float(self) -> bool {
        matches!(self, Num::AfterDecimalPoint | Num::AfterExponent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Literal {
    True,
    False,
    Null,
}

impl Literal {
    const fn as_bytes(self) -> &'static [u8] {
        match self {
            Literal::True => b"true",
            Literal::False => b"false",
            Literal::Null => b"null",
        }
    }

    const fn as_raw_event(self) -> RawEvent {
        match self {
            Literal::True => RawEvent::Boolean(true),
            Literal::False => RawEvent::Boolean(false),
            Literal::Null => RawEvent::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Map {
    /// Right after `{`.
    KeyOrEnd,
    /// After a comma.
    Key,
    Colon,
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Array {
    /// Right after `[`.
    ItemOrEnd,
    /// After a comma.
    Item,
    CommaOrEnd,
}

const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

const fn hex_value(byte: u8) -> Option<u16> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0') as u16),
        b'a'..=b'f' => Some((byte - b'a' + 10) as u16),
        b'A'..=b'F' => Some((byte - b'A' + 10) as u16),
        _ => None,
    }
}

const fn simple_escape(byte: u8) -> Option<u8> {
    match byte {
        b'"' => Some(b'"'),
        b'\\' => Some(b'\\'),
        b'/' => Some(b'/'),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        _ => None,
    }
}

/// Byte-at-a-time JSON tokenizer with cross-chunk continuation state.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    state: State,
    /// Absolute offset of the first byte of the next chunk.
    total_consumed: usize,
    context: ParseContext,
    /// Offset where the string or number being captured started.
    token_start: usize,
    number: String,
    string: RawString,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Creates a tokenizer that rejects containers nested deeper than `max_depth`.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Tokenizer {
            state: State::Idle,
            total_consumed: 0,
            context: ParseContext::new(max_depth),
            token_start: 0,
            number: String::new(),
            string: RawString::new(),
        }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.context.stack.len()
    }

    fn after_value(&self) -> State {
        match self.context.top() {
            Some(Container::Map) => State::Map {
                expect: Map::CommaOrEnd,
            },
            Some(Container::Array) => State::Array {
                expect: Array::CommaOrEnd,
            },
            None => State::Finished,
        }
    }

    fn emit_number(&mut self, state: Num, sink: &mut dyn FnMut(RawEvent, usize)) {
        let text = core::mem::take(&mut self.number);
        let raw = if state.is_float() {
            RawEvent::Float(text)
        } else {
            RawEvent::Integer(text)
        };
        sink(raw, self.token_start);
    }

    /// Handles a byte in a position where a value may start.
    fn begin_value(
        &mut self,
        byte: u8,
        pos: usize,
        sink: &mut dyn FnMut(RawEvent, usize),
    ) -> Result<Option<State>, TokenError> {
        let next = match byte {
            b'[' => {
                self.context.enter(Container::Array, byte, pos)?;
                sink(RawEvent::ArrayStart, pos);
                State::Array {
                    expect: Array::ItemOrEnd,
                }
            }
            b'{' => {
                self.context.enter(Container::Map, byte, pos)?;
                sink(RawEvent::MapStart, pos);
                State::Map {
                    expect: Map::KeyOrEnd,
                }
            }
            b'"' => self.begin_string(pos, false),
            b't' | b'f' | b'n' => {
                let literal = match byte {
                    b't' => Literal::True,
                    b'f' => Literal::False,
                    _ => Literal::Null,
                };
                State::Literal {
                    literal,
                    matched: 1,
                }
            }
            b'-' | b'0'..=b'9' => {
                self.token_start = pos;
                self.number.clear();
                self.number.push(char::from(byte));
                let state = match byte {
                    b'-' => Num::Sign,
                    b'0' => Num::LeadingZero,
                    _ => Num::BeforeDecimalPoint,
                };
                State::Number { state }
            }
            _ => return Ok(None),
        };
        Ok(Some(next))
    }

    fn begin_string(&mut self, pos: usize, key: bool) -> State {
        self.token_start = pos;
        self.string = RawString::new();
        State::String {
            state: Str::Normal,
            key,
        }
    }

    fn close(
        &mut self,
        container: Container,
        byte: u8,
        pos: usize,
        sink: &mut dyn FnMut(RawEvent, usize),
    ) -> Result<State, TokenError> {
        self.context.exit(container, byte, pos)?;
        sink(
            match container {
                Container::Array => RawEvent::ArrayEnd,
                Container::Map => RawEvent::MapEnd,
            },
            pos,
        );
        Ok(self.after_value())
    }

    fn step(
        &mut self,
        byte: u8,
        pos: usize,
        sink: &mut dyn FnMut(RawEvent, usize),
    ) -> Result<State, TokenError> {
        let next = match self.state {
            State::String { state, key } => match (state, byte) {
                (Str::Normal, b'"') => {
                    let raw = core::mem::take(&mut self.string);
                    if key {
                        sink(RawEvent::MapKey(raw), self.token_start);
                        State::Map { expect: Map::Colon }
                    } else {
                        sink(RawEvent::String(raw), self.token_start);
                        self.after_value()
                    }
                }
                (Str::Normal, b'\\') => State::String {
                    state: Str::Escaping,
                    key,
                },
                (Str::Normal, 0x00..=0x1F) => {
                    return TokenError::new(ErrKind::UnescapedControlCharacter, Some(byte), pos)
                }
                (Str::Normal, _) => {
                    self.string.push_byte(byte);
                    self.state
                }
                (Str::Escaping, b'u') => State::String {
                    state: Str::Unicode { digits: 0, unit: 0 },
                    key,
                },
                (Str::Escaping, _) => {
                    let Some(resolved) = simple_escape(byte) else {
                        return TokenError::new(ErrKind::InvalidStringEscape, Some(byte), pos);
                    };
                    self.string.push_byte(resolved);
                    State::String {
                        state: Str::Normal,
                        key,
                    }
                }
                (Str::Unicode { digits, unit }, _) => {
                    let Some(value) = hex_value(byte) else {
                        return TokenError::new(ErrKind::InvalidUnicodeEscape, Some(byte), pos);
                    };
                    let unit = (unit << 4) | value;
                    if digits == 3 {
                        self.string.push_code_unit(unit);
                        State::String {
                            state: Str::Normal,
                            key,
                        }
                    } else {
                        State::String {
                            state: Str::Unicode {
                                digits: digits + 1,
                                unit,
                            },
                            key,
                        }
                    }
                }
            },
            State::Literal { literal, matched } => {
                let expected = literal.as_bytes();
                if expected.get(matched) != Some(&byte) {
                    return TokenError::new(ErrKind::InvalidToken, Some(byte), pos);
                }
                let matched = matched + 1;
                if matched == expected.len() {
                    sink(literal.as_raw_event(), pos + 1 - expected.len());
                    self.after_value()
                } else {
                    State::Literal { literal, matched }
                }
            }
            // Numbers are terminated by the caller, see `parse_chunk_inner`.
            State::Number { .. } => return TokenError::new(ErrKind::InvalidNumber, Some(byte), pos),
            _ if is_whitespace(byte) => self.state,
            State::Idle => match self.begin_value(byte, pos, sink)? {
                Some(next) => next,
                None => return TokenError::new(ErrKind::InvalidRoot, Some(byte), pos),
            },
            State::Finished => return TokenError::new(ErrKind::ContentEnded, Some(byte), pos),
            State::Map { expect } => match (expect, byte) {
                (Map::KeyOrEnd | Map::Key, b'"') => self.begin_string(pos, true),
                (Map::KeyOrEnd, b'}') => self.close(Container::Map, byte, pos, sink)?,
                (Map::Key, b'}') => return TokenError::new(ErrKind::TrailingComma, Some(byte), pos),
                (Map::KeyOrEnd | Map::Key, _) => {
                    return TokenError::new(ErrKind::ExpectedObjectKey, Some(byte), pos)
                }
                (Map::Colon, b':') => State::Map { expect: Map::Value },
                (Map::Colon, _) => return TokenError::new(ErrKind::ExpectedColon, Some(byte), pos),
                (Map::Value, _) => match self.begin_value(byte, pos, sink)? {
                    Some(next) => next,
                    None => {
                        return TokenError::new(ErrKind::ExpectedObjectValue, Some(byte), pos)
                    }
                },
                (Map::CommaOrEnd, b',') => State::Map { expect: Map::Key },
                (Map::CommaOrEnd, b'}') => self.close(Container::Map, byte, pos, sink)?,
                (Map::CommaOrEnd, _) => {
                    return TokenError::new(ErrKind::ExpectedCommaOrEnd, Some(byte), pos)
                }
            },
            State::Array { expect } => match (expect, byte) {
                (Array::ItemOrEnd, b']') => self.close(Container::Array, byte, pos, sink)?,
                (Array::Item, b']') => {
                    return TokenError::new(ErrKind::TrailingComma, Some(byte), pos)
                }
                (Array::ItemOrEnd | Array::Item, _) => match self.begin_value(byte, pos, sink)? {
                    Some(next) => next,
                    None => return TokenError::new(ErrKind::ExpectedArrayItem, Some(byte), pos),
                },
                (Array::CommaOrEnd, b',') => State::Array {
                    expect: Array::Item,
                },
                (Array::CommaOrEnd, b']') => self.close(Container::Array, byte, pos, sink)?,
                (Array::CommaOrEnd, _) => {
                    return TokenError::new(ErrKind::ExpectedCommaOrEnd, Some(byte), pos)
                }
            },
        };
        Ok(next)
    }

    fn parse_chunk_inner(
        &mut self,
        data: &[u8],
        sink: &mut dyn FnMut(RawEvent, usize),
    ) -> Result<usize, TokenError> {
        for (index, &byte) in data.iter().enumerate() {
            let pos = self.total_consumed + index;

            if let State::Number { state } = self.state {
                if let Some(next) = state.step(byte) {
                    self.number.push(char::from(byte));
                    self.state = State::Number { state: next };
                    continue;
                }
                // The literal ends at the first byte that cannot extend it,
                // which must then be a delimiter for the enclosing state.
                let delimiter = matches!(byte, b',' | b']' | b'}') || is_whitespace(byte);
                if !state.is_complete() || !delimiter {
                    return TokenError::new(ErrKind::InvalidNumber, Some(byte), pos);
                }
                self.emit_number(state, sink);
                self.state = self.after_value();
            }

            self.state = self.step(byte, pos, sink)?;
        }
        Ok(data.len())
    }
}

impl TokenParser for Tokenizer {
    fn feed(
        &mut self,
        chunk: &[u8],
        sink: &mut dyn FnMut(RawEvent, usize),
    ) -> Result<usize, TokenError> {
        let consumed = self.parse_chunk_inner(chunk, sink)?;
        self.total_consumed = self.total_consumed.saturating_add(consumed);
        Ok(consumed)
    }

    fn finish(&mut self, sink: &mut dyn FnMut(RawEvent, usize)) -> Result<(), TokenError> {
        let pos = self.total_consumed;
        match self.state {
            State::Finished => Ok(()),
            State::Number { state } if state.is_complete() && self.context.top().is_none() => {
                self.emit_number(state, sink);
                self.state = State::Finished;
                Ok(())
            }
            State::Idle => TokenError::new(ErrKind::EmptyStream, None, pos),
            _ => TokenError::new(ErrKind::UnfinishedStream, None, pos),
        }
    }

    fn offset(&self) -> usize {
        self.total_consumed
    }
}
