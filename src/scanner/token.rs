//! Token representation and the grammar-valid token-set bitset.
//!
//! `TokenKind` is the fixed ordinal set the scanner and its host grammar
//! share (§6 of the design notes). The scanner only ever *constructs* a
//! subset of these variants (`CloseParen`, `CloseBracket`, `CloseBrace`, and
//! `Except` are produced by the grammar, not this crate) — they still need
//! to exist in this type because `TokenSet` (the "which tokens would the
//! grammar currently accept" bitset the host passes in) is drawn from the
//! same alphabet.

use crate::delimiter::Delimiter;
use crate::error::Marker;
use bitflags::bitflags;

/// A single token, with the position it started at.
#[derive(Clone, Debug, PartialEq)]
pub struct Token(pub Marker, pub TokenKind);

impl Token {
    #[inline]
    #[must_use]
    pub const fn new(marker: Marker, kind: TokenKind) -> Self {
        Self(marker, kind)
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Marker {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.1
    }
}

/// The prefix consumed by a `PATH_PREFIX` verdict: `p`, `pf`, or `pr`
/// (case-insensitive).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PathPrefixFlags {
    pub raw: bool,
    pub format: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Newline,
    Indent,
    Dedent,
    StringStart(Delimiter),
    StringContent(String),
    EscapeInterpolation(u8),
    StringEnd,
    Comment,
    /// Produced by the grammar, never by this scanner; see module docs.
    CloseParen,
    /// Produced by the grammar, never by this scanner; see module docs.
    CloseBracket,
    /// Produced by the grammar, never by this scanner; see module docs.
    CloseBrace,
    /// Produced by the grammar, never by this scanner; see module docs.
    Except,
    SubprocessStart,
    LogicalAnd,
    LogicalOr,
    BackgroundAmp,
    KeywordAnd,
    KeywordOr,
    SubprocessMacroStart(String),
    BlockMacroStart,
    PathPrefix(PathPrefixFlags),
}

bitflags! {
    /// The set of token kinds the grammar would currently accept. The host
    /// recomputes this before every scanner invocation; the scanner never
    /// mutates it.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct TokenSet: u32 {
        const NEWLINE                 = 1 << 0;
        const INDENT                  = 1 << 1;
        const DEDENT                  = 1 << 2;
        const STRING_START            = 1 << 3;
        const STRING_CONTENT          = 1 << 4;
        const ESCAPE_INTERPOLATION    = 1 << 5;
        const STRING_END              = 1 << 6;
        const COMMENT                 = 1 << 7;
        const CLOSE_PAREN             = 1 << 8;
        const CLOSE_BRACKET           = 1 << 9;
        const CLOSE_BRACE             = 1 << 10;
        const EXCEPT                  = 1 << 11;
        const SUBPROCESS_START        = 1 << 12;
        const LOGICAL_AND             = 1 << 13;
        const LOGICAL_OR              = 1 << 14;
        const BACKGROUND_AMP          = 1 << 15;
        const KEYWORD_AND             = 1 << 16;
        const KEYWORD_OR              = 1 << 17;
        const SUBPROCESS_MACRO_START  = 1 << 18;
        const BLOCK_MACRO_START       = 1 << 19;
        const PATH_PREFIX             = 1 << 20;
    }
}

impl TokenSet {
    /// True if the grammar currently accepts a token that closes a bracket
    /// pair — used by the indent engine and the dispatcher to infer "inside
    /// brackets" without the scanner tracking paren depth itself.
    #[inline]
    #[must_use]
    pub fn inside_brackets(self) -> bool {
        self.intersects(TokenSet::CLOSE_PAREN | TokenSet::CLOSE_BRACKET | TokenSet::CLOSE_BRACE)
    }

    /// Error-recovery mode is signalled by the grammar simultaneously
    /// accepting both STRING_CONTENT and INDENT (§4.1, §7).
    #[inline]
    #[must_use]
    pub fn error_recovery(self) -> bool {
        self.contains(TokenSet::STRING_CONTENT) && self.contains(TokenSet::INDENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_brackets_detection() {
        assert!(TokenSet::CLOSE_PAREN.inside_brackets());
        assert!(!TokenSet::NEWLINE.inside_brackets());
    }

    #[test]
    fn error_recovery_requires_both() {
        assert!((TokenSet::STRING_CONTENT | TokenSet::INDENT).error_recovery());
        assert!(!TokenSet::STRING_CONTENT.error_recovery());
        assert!(!TokenSet::INDENT.error_recovery());
    }
}
