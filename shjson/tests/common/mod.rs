// SPDX-License-Identifier: Apache-2.0

//! Helpers shared by the integration tests.

#![allow(dead_code)]

use shjson::{ChunkReader, Event, JsonNumber, ParseError, ParserOptions, Reader, StreamParser};

/// Parses `data` handing the parser at most `chunk_size` bytes per read.
pub fn collect_chunked(data: &[u8], chunk_size: usize) -> Result<Vec<Event>, ParseError> {
    StreamParser::new(ChunkReader::new(data, chunk_size)).collect()
}

/// Parses `data` with a read size of `read_size` bytes.
pub fn collect_with_read_size(data: &[u8], read_size: usize) -> Result<Vec<Event>, ParseError> {
    let options = ParserOptions {
        read_size,
        ..Default::default()
    };
    StreamParser::with_options(ChunkReader::full_slice(data), options).collect()
}

/// Events seen before the parse ended, and the error it ended with, if any.
pub fn collect_until_error(data: &[u8], chunk_size: usize) -> (Vec<Event>, Option<ParseError>) {
    let mut parser = StreamParser::new(ChunkReader::new(data, chunk_size));
    let mut events = Vec::new();
    loop {
        match parser.next_event() {
            Ok(Some(event)) => events.push(event),
            Ok(None) => return (events, None),
            Err(err) => return (events, Some(err)),
        }
    }
}

/// Reader that cuts its input at the given split sizes, then hands out the
/// rest in one piece.
pub struct SplitReader<'a> {
    data: &'a [u8],
    splits: std::vec::IntoIter<usize>,
}

impl<'a> SplitReader<'a> {
    pub fn new(data: &'a [u8], splits: Vec<usize>) -> Self {
        Self {
            data,
            splits: splits.into_iter(),
        }
    }
}

impl Reader for SplitReader<'_> {
    type Error = std::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.data.is_empty() {
            return Ok(0);
        }
        let limit = match self.splits.next() {
            Some(split) => 1 + split % self.data.len(),
            None => self.data.len(),
        };
        let len = limit.min(buf.len());
        let (head, tail) = self.data.split_at(len);
        buf[..len].copy_from_slice(head);
        self.data = tail;
        Ok(len)
    }
}

/// Reader that counts how many bytes were pulled from it.
pub struct CountingReader<'a> {
    inner: ChunkReader<'a>,
    pub bytes_read: usize,
    pub reads: usize,
}

impl<'a> CountingReader<'a> {
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            inner: ChunkReader::new(data, chunk_size),
            bytes_read: 0,
            reads: 0,
        }
    }
}

impl Reader for CountingReader<'_> {
    type Error = std::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let len = self.inner.read(buf)?;
        self.reads += 1;
        self.bytes_read += len;
        Ok(len)
    }
}

fn number_value(number: &JsonNumber) -> serde_json::Value {
    if let Some(value) = number.as_i64() {
        serde_json::Value::from(value)
    } else if let Some(value) = number.as_u64() {
        serde_json::Value::from(value)
    } else {
        number
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

enum Frame {
    Array(Vec<serde_json::Value>),
    Map(serde_json::Map<String, serde_json::Value>, Option<String>),
}

/// Rebuilds the document described by `events`.
///
/// Panics if the events are not a well-formed pre-order walk of exactly one
/// value.
pub fn build_value(events: &[Event]) -> serde_json::Value {
    let mut stack: Vec<Frame> = Vec::new();
    let mut root = None;

    fn attach(
        stack: &mut [Frame],
        root: &mut Option<serde_json::Value>,
        value: serde_json::Value,
    ) {
        match stack.last_mut() {
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Map(map, key)) => {
                let key = key.take().expect("value in map without a key");
                map.insert(key, value);
            }
            None => {
                assert!(root.is_none(), "more than one root value");
                *root = Some(value);
            }
        }
    }

    for event in events {
        match event {
            Event::StartArray => stack.push(Frame::Array(Vec::new())),
            Event::StartMap => stack.push(Frame::Map(serde_json::Map::new(), None)),
            Event::EndArray => match stack.pop() {
                Some(Frame::Array(items)) => {
                    attach(&mut stack, &mut root, serde_json::Value::Array(items))
                }
                _ => panic!("unbalanced end_array"),
            },
            Event::EndMap => match stack.pop() {
                Some(Frame::Map(map, None)) => {
                    attach(&mut stack, &mut root, serde_json::Value::Object(map))
                }
                _ => panic!("unbalanced end_map"),
            },
            Event::MapKey(name) => match stack.last_mut() {
                Some(Frame::Map(_, key @ None)) => *key = Some(name.clone()),
                _ => panic!("map_key outside of key position"),
            },
            Event::String(text) => attach(
                &mut stack,
                &mut root,
                serde_json::Value::String(text.clone()),
            ),
            Event::Number(number) => attach(&mut stack, &mut root, number_value(number)),
            Event::Boolean(value) => attach(&mut stack, &mut root, serde_json::Value::Bool(*value)),
            Event::Null => attach(&mut stack, &mut root, serde_json::Value::Null),
        }
    }

    assert!(stack.is_empty(), "unclosed containers");
    root.expect("no root value")
}
