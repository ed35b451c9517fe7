//! Position tracking and the scanner's own error surface.
//!
//! The scanner does not error on ordinary scanning ambiguity — it either
//! emits a token or emits nothing. `LexError` exists only for host-contract
//! violations: cases where the `LexerIO` the scanner is driving misbehaves.

use thiserror::Error;

/// A position in the source the scanner is reading.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Marker {
    pub index: usize,
    pub line: usize,
    pub col: usize,
}

impl Marker {
    #[inline]
    #[must_use]
    pub const fn start() -> Self {
        Self {
            index: 0,
            line: 1,
            col: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn at(index: usize, line: usize, col: usize) -> Self {
        Self { index, line, col }
    }

    /// Advance past a single consumed byte, tracking line/column.
    #[inline]
    pub fn advance(&mut self, byte: u8) {
        self.index += 1;
        if byte == b'\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
    }
}

/// Errors the scanner itself can raise. These indicate the host `LexerIO`
/// broke its contract, not that the source text is malformed — malformed
/// source is communicated by emitting no token.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LexError {
    #[error(
        "serialized scanner state is truncated: declared {declared} delimiters, buffer holds {available}"
    )]
    TruncatedState { declared: usize, available: usize },
}
