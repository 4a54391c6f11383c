// SPDX-License-Identifier: Apache-2.0

use crate::tokenizer::DEFAULT_MAX_DEPTH;

/// Default number of bytes requested from the reader per read.
pub const DEFAULT_READ_SIZE: usize = 32 * 1024;

/// Configuration options for [`StreamParser`](crate::StreamParser).
///
/// # Examples
///
/// ```rust
/// use shjson::{ChunkReader, ParserOptions, StreamParser};
///
/// let options = ParserOptions {
///     read_size: 4096,
///     ..Default::default()
/// };
/// let parser = StreamParser::with_options(ChunkReader::full_slice(b"[]"), options);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum number of bytes requested from the reader in one `read` call.
    ///
    /// This also bounds how many events a single refill of the event buffer
    /// can produce. Values below 1 are treated as 1.
    ///
    /// # Default
    ///
    /// `32768`
    pub read_size: usize,

    /// Maximum nesting depth of arrays and objects.
    ///
    /// Input nested deeper fails with
    /// [`ErrKind::MaxDepthReached`](crate::ErrKind::MaxDepthReached).
    ///
    /// # Default
    ///
    /// `1024`
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            read_size: DEFAULT_READ_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserOptions {
    pub(crate) fn effective_read_size(&self) -> usize {
        self.read_size.max(1)
    }
}
