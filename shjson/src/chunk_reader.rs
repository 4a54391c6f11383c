// SPDX-License-Identifier: Apache-2.0

//! Ready-made [`Reader`] implementations.
//!
//! [`ChunkReader`] serves in-memory byte slices, either whole or in
//! fixed-size chunks to simulate streaming. With the `std` feature,
//! [`IoReader`] adapts any [`std::io::Read`] source such as a file or a
//! socket.
//!
//! # Examples
//!
//! ```rust
//! use shjson::{ChunkReader, StreamParser};
//!
//! let json = br#"{"name": "Alice", "age": 30}"#;
//! let reader = ChunkReader::full_slice(json);
//! let parser = StreamParser::new(reader);
//!
//! for event in parser {
//!     match event {
//!         Ok(event) => println!("Event: {}", event),
//!         Err(e) => eprintln!("Parse error: {}", e),
//!     }
//! }
//! ```

use core::convert::Infallible;

use crate::Reader;

/// A [`Reader`] that reads from a byte slice, optionally in fixed-size chunks.
///
/// 1.  **Full Slice Reading**: [`ChunkReader::full_slice()`] hands out as much
///     of the slice as the parser asks for.
///
/// 2.  **Chunked Reading**: [`ChunkReader::new()`] limits each `read()` call to
///     a maximum chunk size, which is useful for exercising the parser's
///     handling of tokens split across reads.
///
/// # Example: Chunked Reading
///
/// ```rust
/// use shjson::{ChunkReader, Event, StreamParser};
///
/// // Simulate reading only 2 bytes at a time
/// let reader = ChunkReader::new(br#"[true, "split"]"#, 2);
/// let events: Result<Vec<Event>, _> = StreamParser::new(reader).collect();
/// assert_eq!(events.unwrap().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkReader<'a> {
    /// Create a new chunked reader from a byte slice.
    ///
    /// Each call to `read()` will return at most `chunk_size` bytes,
    /// even if more data is available and the buffer can hold more.
    ///
    /// # Arguments
    ///
    /// * `data` - The byte slice containing JSON data
    /// * `chunk_size` - Maximum bytes to return per read() call (minimum 1)
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Create a new reader that consumes the entire byte slice at once.
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: usize::MAX,
        }
    }

    /// Number of bytes handed out so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Reader for ChunkReader<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.data.get(self.pos..).unwrap_or_default();
        let to_copy = remaining.len().min(buf.len()).min(self.chunk_size);

        if let (Some(dest), Some(src)) = (buf.get_mut(..to_copy), remaining.get(..to_copy)) {
            dest.copy_from_slice(src);
            self.pos = self.pos.saturating_add(to_copy);
            Ok(to_copy)
        } else {
            Ok(0)
        }
    }
}

#[cfg(feature = "std")]
pub use self::io::IoReader;

#[cfg(feature = "std")]
mod io {
    use std::io::{ErrorKind, Read};

    use crate::Reader;

    /// A [`Reader`] over any [`std::io::Read`] source.
    ///
    /// Interrupted reads are retried; every other I/O error is passed on.
    ///
    /// ```rust,no_run
    /// use shjson::{IoReader, StreamParser};
    ///
    /// let file = std::fs::File::open("data.json")?;
    /// for event in StreamParser::new(IoReader::new(file)) {
    ///     println!("{}", event?);
    /// }
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[derive(Debug)]
    pub struct IoReader<T> {
        inner: T,
    }

    impl<T: Read> IoReader<T> {
        pub fn new(inner: T) -> Self {
            Self { inner }
        }

        pub fn get_ref(&self) -> &T {
            &self.inner
        }

        pub fn into_inner(self) -> T {
            self.inner
        }
    }

    impl<T: Read> Reader for IoReader<T> {
        type Error = std::io::Error;

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            loop {
                match self.inner.read(buf) {
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    other => return other,
                }
            }
        }
    }
}
