// SPDX-License-Identifier: Apache-2.0

mod common;

use common::{collect_chunked, CountingReader};
use num_bigint::BigInt;
use shjson::{
    basic_parse, parse_slice, ChunkReader, Event, EventKind, IoReader, JsonNumber, ParseError,
    StreamParser,
};
use test_log::test;

fn int(value: i64) -> Event {
    Event::Number(JsonNumber::from(value))
}

#[test]
fn test_mixed_scalar_array() {
    let json = r#"[null,true,false,1,1.1,111111111111111111111.111111111111,"Österreich"]"#;
    let events: Vec<Event> = parse_slice(json.as_bytes())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        events,
        [
            Event::StartArray,
            Event::Null,
            Event::Boolean(true),
            Event::Boolean(false),
            int(1),
            Event::Number(JsonNumber::Float(1.1)),
            Event::Number(JsonNumber::Float(111111111111111111111.111111111111)),
            Event::String("Österreich".to_string()),
            Event::EndArray,
        ]
    );

    let kinds: Vec<&str> = events.iter().map(|e| e.kind().as_str()).collect();
    assert_eq!(
        kinds,
        [
            "start_array",
            "null",
            "boolean",
            "boolean",
            "number",
            "number",
            "number",
            "string",
            "end_array"
        ]
    );
}

#[test]
fn test_large_integer_stays_exact() {
    let events = collect_chunked(b"[111111111111111111111]", 5).unwrap();
    let expected: BigInt = "111111111111111111111".parse().unwrap();
    assert_eq!(events[1], Event::Number(JsonNumber::Integer(expected)));
}

#[test]
fn test_float_precision() {
    let events = collect_chunked(b"1.1", 1).unwrap();
    match &events[..] {
        [Event::Number(number)] => {
            assert!(number.is_float());
            assert_eq!(number.as_f64(), Some(1.1));
        }
        other => panic!("Expected a single number, got {:?}", other),
    }
}

#[test]
fn test_nested_document() {
    let json = br#"{"name": "Alice", "tags": ["a", "b"], "meta": {"age": 30, "ok": true}}"#;
    let events = collect_chunked(json, 7).unwrap();
    assert_eq!(
        events,
        [
            Event::StartMap,
            Event::MapKey("name".into()),
            Event::String("Alice".into()),
            Event::MapKey("tags".into()),
            Event::StartArray,
            Event::String("a".into()),
            Event::String("b".into()),
            Event::EndArray,
            Event::MapKey("meta".into()),
            Event::StartMap,
            Event::MapKey("age".into()),
            int(30),
            Event::MapKey("ok".into()),
            Event::Boolean(true),
            Event::EndMap,
            Event::EndMap,
        ]
    );
}

#[test]
fn test_one_byte_feed_matches_single_chunk() {
    let json = br#"{"a":1}"#;
    let expected = vec![
        Event::StartMap,
        Event::MapKey("a".into()),
        int(1),
        Event::EndMap,
    ];
    assert_eq!(collect_chunked(json, json.len()).unwrap(), expected);
    assert_eq!(collect_chunked(json, 1).unwrap(), expected);
}

#[test]
fn test_truncated_array() {
    let mut parser = StreamParser::new(ChunkReader::full_slice(b"[1, 2,"));
    assert_eq!(parser.next_event(), Ok(Some(Event::StartArray)));
    assert_eq!(parser.next_event(), Ok(Some(int(1))));
    assert_eq!(parser.next_event(), Ok(Some(int(2))));
    assert_eq!(parser.next_event(), Err(ParseError::PrematureEnd { offset: 6 }));
}

#[test]
fn test_scalar_roots() {
    assert_eq!(collect_chunked(b"\"hi\"", 1).unwrap(), [Event::String("hi".into())]);
    assert_eq!(collect_chunked(b" null ", 2).unwrap(), [Event::Null]);
    assert_eq!(collect_chunked(b"-0", 1).unwrap(), [int(0)]);
    assert_eq!(
        collect_chunked(b"0.5e-2", 3).unwrap(),
        [Event::Number(JsonNumber::Float(0.005))]
    );
}

#[test]
fn test_empty_containers() {
    assert_eq!(
        collect_chunked(b"[{}, [], {\"\": []}]", 2).unwrap(),
        [
            Event::StartArray,
            Event::StartMap,
            Event::EndMap,
            Event::StartArray,
            Event::EndArray,
            Event::StartMap,
            Event::MapKey(String::new()),
            Event::StartArray,
            Event::EndArray,
            Event::EndMap,
            Event::EndArray,
        ]
    );
}

#[test]
fn test_string_escapes() {
    let json = r#"["\"\\\/\b\f\n\r\t", "Aé中"]"#;
    let events = collect_chunked(json.as_bytes(), 3).unwrap();
    assert_eq!(events[1], Event::String("\"\\/\u{8}\u{c}\n\r\t".into()));
    assert_eq!(events[2], Event::String("Aé中".into()));
}

#[test]
fn test_keys_are_decoded() {
    let events = collect_chunked(r#"{"café": 1, "k\n": 2}"#.as_bytes(), 4).unwrap();
    assert_eq!(events[1], Event::MapKey("café".into()));
    assert_eq!(events[3], Event::MapKey("k\n".into()));
}

#[test]
fn test_multibyte_utf8_split_across_reads() {
    let json = "[\"Österreich, 日本 😀\"]".as_bytes();
    for chunk_size in 1..=json.len() {
        let events = collect_chunked(json, chunk_size).unwrap();
        assert_eq!(events[1], Event::String("Österreich, 日本 😀".into()));
    }
}

#[test]
fn test_whitespace_everywhere() {
    let json = b" \t\r\n{ \"a\" \n: [ 1 , 2 ] ,\r\n \"b\" : null } \n";
    let events = collect_chunked(json, 1).unwrap();
    assert_eq!(events.len(), 9);
    assert_eq!(events.first(), Some(&Event::StartMap));
    assert_eq!(events.last(), Some(&Event::EndMap));
}

#[test]
fn test_event_kind_display() {
    assert_eq!(EventKind::MapKey.to_string(), "map_key");
    assert_eq!(Event::Number(JsonNumber::from(3i64)).to_string(), "number: 3");
}

#[test]
fn test_basic_parse_over_io() {
    let cursor = std::io::Cursor::new(br#"{"list": [1, 2.5]}"#.to_vec());
    let events: Vec<Event> = basic_parse(IoReader::new(cursor))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(events.len(), 7);
    assert_eq!(events[4], Event::Number(JsonNumber::Float(2.5)));
}

#[test]
fn test_early_termination_reads_little() {
    let mut json = b"[".to_vec();
    for i in 0..100_000 {
        if i > 0 {
            json.push(b',');
        }
        json.extend_from_slice(i.to_string().as_bytes());
    }
    json.push(b']');

    let mut reader = CountingReader::new(&json, 16);
    {
        let mut parser = basic_parse(&mut reader);
        assert_eq!(parser.next_event(), Ok(Some(Event::StartArray)));
        assert_eq!(parser.next_event(), Ok(Some(int(0))));
        assert_eq!(parser.next_event(), Ok(Some(int(1))));
    }
    assert_eq!(reader.reads, 1);
    assert_eq!(reader.bytes_read, 16);
}

#[test]
fn test_bytes_consumed_is_monotonic() {
    let json = br#"{"a": [1, 2, 3], "b": "text"}"#;
    let mut parser = StreamParser::new(ChunkReader::new(json, 3));
    let mut last = 0;
    while let Some(_event) = parser.next_event().unwrap() {
        let consumed = parser.bytes_consumed();
        assert!(consumed >= last);
        last = consumed;
    }
    assert_eq!(parser.bytes_consumed(), json.len());
}
