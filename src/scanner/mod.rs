//! The scanner: a fixed-priority dispatcher over the engines in this module,
//! run once per host invocation against the grammar-valid `TokenSet`.

pub mod indentation;
pub mod operators;
pub mod predict;
pub mod scalars;
pub mod state;
pub mod token;
pub mod utils;

pub use state::ScannerState;
pub use token::{PathPrefixFlags, Token, TokenKind, TokenSet};

use crate::config::ScannerConfig;
use crate::io::LexerIO;

/// Holds the state that persists between invocations (indent/delimiter
/// stacks) plus the tunables that shape it. Does not own the source buffer;
/// that lives behind the host-provided [`LexerIO`] passed to [`Scanner::scan`].
#[derive(Clone, Debug, Default)]
pub struct Scanner {
    state: ScannerState,
    config: ScannerConfig,
}

impl Scanner {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ScannerConfig::default())
    }

    #[inline]
    #[must_use]
    pub fn with_config(config: ScannerConfig) -> Self {
        Self {
            state: ScannerState::new(),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Restore a scanner from a state buffer produced by
    /// [`ScannerState::serialize`], keeping `config`.
    pub fn restore(config: ScannerConfig, state_buf: &[u8]) -> Result<Self, crate::error::LexError> {
        Ok(Self {
            state: ScannerState::deserialize(state_buf)?,
            config,
        })
    }

    /// Attempt to produce one token from the current position. Returns
    /// `None` if every engine declines, leaving the grammar's own
    /// productions (or a later invocation) to make progress instead.
    ///
    /// Runs the engines in a fixed priority order: brace-escape, then
    /// string content/end, then indent/newline/comment, then the `&&`/`&`/
    /// `||` symbol disambiguator, then the `and`/`or` keyword forms, then
    /// (only at a fresh logical line, outside brackets and strings, not in
    /// error recovery, and not looking at a bare quote) the line-class
    /// predictor, finally falling back to a bare prefix-then-quote string
    /// start anywhere `STRING_START` is grammar-valid.
    pub fn scan<IO: LexerIO>(&mut self, io: &mut IO, valid: TokenSet) -> Option<Token> {
        log::trace!("dispatcher: brace_escape");
        if let Some(token) = scalars::scan_brace_escape(&self.state, io, valid) {
            return Some(token);
        }
        log::trace!("dispatcher: string_content_or_end");
        if let Some(token) = scalars::scan_string(&mut self.state, io, valid) {
            return Some(token);
        }
        log::trace!("dispatcher: indentation");
        if let Some(token) = indentation::scan(&mut self.state, io, valid, &self.config) {
            return Some(token);
        }
        log::trace!("dispatcher: operator_symbol");
        if let Some(token) = operators::scan_symbol(io, valid) {
            return Some(token);
        }
        log::trace!("dispatcher: operator_keyword");
        if let Some(token) = operators::scan_keyword(io, valid) {
            return Some(token);
        }
        if self.at_line_class_context(io, valid) {
            log::trace!("dispatcher: line_class_predictor");
            if let Some(token) = predict::predict(&mut self.state, io, valid) {
                return Some(token);
            }
        }
        log::trace!("dispatcher: generic_string_start");
        scalars::scan_start(&mut self.state, io, valid)
    }

    /// Preconditions of §4.4: zero bracket nesting, no active string, not in
    /// error recovery, and the next byte is not a bare quote (that case is
    /// left to the generic string-start fallback).
    fn at_line_class_context<IO: LexerIO>(&self, io: &IO, valid: TokenSet) -> bool {
        !valid.error_recovery()
            && !valid.inside_brackets()
            && self.state.top_delimiter().is_none()
            && !matches!(io.peek(), Some(b'\'') | Some(b'"'))
    }
}
