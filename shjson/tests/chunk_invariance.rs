// SPDX-License-Identifier: Apache-2.0

//! The event sequence must not depend on how the input is split.

mod common;

use common::{collect_chunked, collect_until_error, collect_with_read_size};
use test_log::test;

const DOCUMENT: &[u8] = br#"{
    "id": 123456789012345678901234567890,
    "ratio": -0.25e-3,
    "name": "Gr\u00fc\u00dfe \"quoted\" \ud83d\ude00",
    "tags": ["a", "", "ccc", [], {}],
    "nested": {"deep": [[[true, false, null]]], "empty": ""},
    "numbers": [0, -0, 1, -1, 1.5, 1e10, 2E-2, 0.000001, 12345678901234567890]
}"#;

const BROKEN: &[u8] = br#"{"ok": [1, 2, {"fine": null}], "bad": [tru"#;

macro_rules! chunk_size_tests {
    ($($size:expr),*) => {
        $(
            paste::paste! {
                #[test]
                fn [<test_chunk_size_ $size>]() {
                    let expected = collect_chunked(DOCUMENT, DOCUMENT.len()).unwrap();
                    assert_eq!(collect_chunked(DOCUMENT, $size).unwrap(), expected);
                }

                #[test]
                fn [<test_read_size_ $size>]() {
                    let expected = collect_chunked(DOCUMENT, DOCUMENT.len()).unwrap();
                    assert_eq!(collect_with_read_size(DOCUMENT, $size).unwrap(), expected);
                }

                #[test]
                fn [<test_broken_chunk_size_ $size>]() {
                    let expected = collect_until_error(BROKEN, BROKEN.len());
                    assert!(expected.1.is_some());
                    assert_eq!(collect_until_error(BROKEN, $size), expected);
                }
            }
        )*
    };
}

chunk_size_tests!(1, 2, 3, 4, 5, 7, 8, 13, 16, 31, 64, 100, 256);

#[test]
fn test_every_chunk_size() {
    let expected = collect_chunked(DOCUMENT, DOCUMENT.len()).unwrap();
    for size in 1..=DOCUMENT.len() {
        assert_eq!(collect_chunked(DOCUMENT, size).unwrap(), expected, "chunk size {}", size);
    }
}
