//! An external lexical scanner for a shell-augmented Python dialect,
//! designed to sit beneath a GLR-style incremental parser.
//!
//! The scanner never owns the source buffer or decides grammar validity on
//! its own; each invocation of [`Scanner::scan`] receives a [`TokenSet`] of
//! what the host grammar would currently accept and either emits exactly one
//! token or declines, leaving the grammar's own productions to make
//! progress. State that must persist across invocations — open indentation
//! levels, open string delimiters — lives in [`ScannerState`] and can be
//! checkpointed with [`ScannerState::serialize`]/[`ScannerState::deserialize`].

pub mod config;
pub mod delimiter;
pub mod dict;
pub mod error;
pub mod io;
pub mod scanner;

pub use config::ScannerConfig;
pub use delimiter::Delimiter;
pub use error::{LexError, Marker};
pub use io::{LexerIO, SliceLexerIO};
pub use scanner::{PathPrefixFlags, Scanner, ScannerState, Token, TokenKind, TokenSet};
