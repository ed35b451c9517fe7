//! Indent/newline engine: emits NEWLINE, INDENT, DEDENT, and COMMENT,
//! honoring line continuations and bracket nesting.
//!
//! The engine only measures ahead via `peek_at` — it never commits a byte
//! with `skip` until it has decided which token (if any) this invocation
//! emits. That matters because a NEWLINE for a line whose next logical line
//! is *more* indented has to stop consuming right at the newline, leaving
//! that next line's indentation unconsumed for a later INDENT call to
//! measure; `LexerIO::skip`/`advance` can't be undone, so measuring by
//! mutating as we went made that case unrecoverable. `ScannerState::seen_eol`
//! carries "a line transition is still unresolved" across the calls that
//! split NEWLINE from the INDENT/DEDENT that follows it.

use crate::config::ScannerConfig;
use crate::io::LexerIO;
use crate::scanner::state::ScannerState;
use crate::scanner::token::{Token, TokenKind, TokenSet};

/// Attempt to produce a token from the current position. Returns `None` if
/// this invocation contributes nothing, leaving the dispatcher free to try
/// the next engine.
pub fn scan<IO: LexerIO>(
    state: &mut ScannerState,
    io: &mut IO,
    valid: TokenSet,
    config: &ScannerConfig,
) -> Option<Token> {
    if valid.error_recovery() {
        log::debug!("indentation: error-recovery mode, suppressing indent/newline");
        return None;
    }

    let start = io.mark();
    let mut offset = 0usize;
    let mut seen_eol = false;
    let mut column: u32 = 0;
    let mut newline_end: Option<usize> = None;

    loop {
        match io.peek_at(offset) {
            Some(b' ') => {
                column += 1;
                offset += 1;
            }
            Some(b'\t') => {
                column = (column + 8) & !7;
                offset += 1;
            }
            Some(b'\r') | Some(b'\x0c') => {
                offset += 1;
            }
            Some(b'\n') => {
                offset += 1;
                seen_eol = true;
                column = 0;
                newline_end = Some(offset);
            }
            Some(b'\\') if is_line_continuation_at(io, offset) => {
                offset += line_continuation_len(io, offset);
            }
            Some(b'#') => {
                let line_start = seen_eol || state.seen_eol();
                return Some(scan_comment(state, io, offset, line_start, column));
            }
            _ => break,
        }
    }

    let at_eof = io.peek_at(offset).is_none();
    let pending = seen_eol || state.seen_eol();

    if !pending && !at_eof {
        return None;
    }

    let effective_column = if at_eof { 0 } else { column };
    let top = state.current_indent();

    if effective_column > top && valid.contains(TokenSet::INDENT) {
        skip_n(io, offset);
        state.push_indent(effective_column, config);
        state.set_seen_eol(false);
        io.mark_end();
        return Some(Token::new(start, TokenKind::Indent));
    }

    if effective_column < top && dedent_allowed(state, valid, top) {
        skip_n(io, offset);
        state.pop_indent();
        state.set_seen_eol(effective_column != state.current_indent());
        io.mark_end();
        return Some(Token::new(start, TokenKind::Dedent));
    }

    if valid.contains(TokenSet::NEWLINE) && (newline_end.is_some() || at_eof) {
        skip_n(io, newline_end.unwrap_or(0));
        state.set_seen_eol(effective_column != top);
        io.mark_end();
        return Some(Token::new(start, TokenKind::Newline));
    }

    None
}

fn dedent_allowed(state: &ScannerState, valid: TokenSet, top: u32) -> bool {
    let dedent_allowed_by_context = valid.contains(TokenSet::DEDENT)
        || (!valid.contains(TokenSet::NEWLINE)
            && !valid.contains(TokenSet::STRING_START)
            && !valid.inside_brackets());
    let comment_blocks_dedent = state.first_comment_indent().is_some_and(|indent| indent >= top);
    dedent_allowed_by_context && !state.inside_interpolated() && !comment_blocks_dedent
}

/// True iff the byte `offset` bytes ahead begins a `\` + optional `\r` +
/// `\n`-or-EOF line continuation.
fn is_line_continuation_at<IO: LexerIO + ?Sized>(io: &IO, offset: usize) -> bool {
    let mut probe = offset + 1;
    if io.peek_at(probe) == Some(b'\r') {
        probe += 1;
    }
    matches!(io.peek_at(probe), Some(b'\n')) || io.peek_at(probe).is_none()
}

/// Byte length of the continuation starting at `offset` (already confirmed
/// by [`is_line_continuation_at`]).
fn line_continuation_len<IO: LexerIO + ?Sized>(io: &IO, offset: usize) -> usize {
    let mut len = 1;
    let mut probe = offset + 1;
    if io.peek_at(probe) == Some(b'\r') {
        len += 1;
        probe += 1;
    }
    if io.peek_at(probe) == Some(b'\n') {
        len += 1;
    }
    len
}

fn skip_n<IO: LexerIO + ?Sized>(io: &mut IO, count: usize) {
    for _ in 0..count {
        io.skip();
    }
}

fn scan_comment<IO: LexerIO>(
    state: &mut ScannerState,
    io: &mut IO,
    prefix_len: usize,
    line_start: bool,
    column: u32,
) -> Token {
    skip_n(io, prefix_len);
    let start = io.mark();
    if line_start {
        state.set_first_comment_indent(Some(column));
    }
    while let Some(byte) = io.peek() {
        if byte == b'\n' {
            break;
        }
        io.skip();
    }
    io.mark_end();
    Token::new(start, TokenKind::Comment)
}
