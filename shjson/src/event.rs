// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use crate::json_number::JsonNumber;

/// A parse event, produced in document order.
///
/// Container events always come in balanced pairs, and every `MapKey` is
/// followed by exactly one value (a scalar or a whole container).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The start of an array `[`.
    StartArray,
    /// The end of an array `]`.
    EndArray,
    /// The start of an object `{`.
    StartMap,
    /// The end of an object `}`.
    EndMap,
    /// An object key, decoded.
    MapKey(String),
    /// A string value, decoded.
    String(String),
    /// A number value.
    Number(JsonNumber),
    /// A boolean value.
    Boolean(bool),
    /// A null value.
    Null,
}

/// The kind of an [`Event`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StartArray,
    EndArray,
    StartMap,
    EndMap,
    MapKey,
    String,
    Number,
    Boolean,
    Null,
}

impl EventKind {
    /// Canonical snake_case name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::StartArray => "start_array",
            EventKind::EndArray => "end_array",
            EventKind::StartMap => "start_map",
            EventKind::EndMap => "end_map",
            EventKind::MapKey => "map_key",
            EventKind::String => "string",
            EventKind::Number => "number",
            EventKind::Boolean => "boolean",
            EventKind::Null => "null",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::StartArray => EventKind::StartArray,
            Event::EndArray => EventKind::EndArray,
            Event::StartMap => EventKind::StartMap,
            Event::EndMap => EventKind::EndMap,
            Event::MapKey(_) => EventKind::MapKey,
            Event::String(_) => EventKind::String,
            Event::Number(_) => EventKind::Number,
            Event::Boolean(_) => EventKind::Boolean,
            Event::Null => EventKind::Null,
        }
    }

    /// Returns true for events that open a container.
    pub fn is_start(&self) -> bool {
        matches!(self, Event::StartArray | Event::StartMap)
    }

    /// Returns true for events that close a container.
    pub fn is_end(&self) -> bool {
        matches!(self, Event::EndArray | Event::EndMap)
    }
}

/// Formats as `kind` or `kind: value`.
impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let kind = self.kind();
        match self {
            Event::MapKey(text) | Event::String(text) => write!(f, "{kind}: {text:?}"),
            Event::Number(number) => write!(f, "{kind}: {number}"),
            Event::Boolean(value) => write!(f, "{kind}: {value}"),
            _ => f.write_str(kind.as_str()),
        }
    }
}
