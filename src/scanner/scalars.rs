//! String engine: start, content, brace-escape, and end, for the
//! single/double/triple, raw/format/bytes delimiter combinations.

use crate::delimiter::Delimiter;
use crate::error::Marker;
use crate::io::LexerIO;
use crate::scanner::state::ScannerState;
use crate::scanner::token::{PathPrefixFlags, Token, TokenKind, TokenSet};
use crate::scanner::utils::is_identifier_continue;

/// Step 1 of the dispatcher: `{{`/`}}` inside an active format string.
/// A single `{` or `}` is left alone so the grammar can enter/exit a hole.
pub fn scan_brace_escape<IO: LexerIO>(state: &ScannerState, io: &mut IO, valid: TokenSet) -> Option<Token> {
    if !valid.contains(TokenSet::ESCAPE_INTERPOLATION) {
        return None;
    }
    let delimiter = state.top_delimiter()?;
    if !delimiter.is_format() {
        return None;
    }
    let byte = io.peek()?;
    if byte != b'{' && byte != b'}' {
        return None;
    }
    if io.peek_at(1) != Some(byte) {
        return None;
    }
    let start = io.mark();
    io.advance();
    io.advance();
    io.mark_end();
    Some(Token::new(start, TokenKind::EscapeInterpolation(byte)))
}

/// Steps 2: string content or string end, for whichever delimiter is on
/// top of the stack.
pub fn scan_string<IO: LexerIO>(state: &mut ScannerState, io: &mut IO, valid: TokenSet) -> Option<Token> {
    let delimiter = state.top_delimiter()?;

    if valid.contains(TokenSet::STRING_END) && at_closing_delimiter(io, delimiter) {
        let start = io.mark();
        let close_len = if delimiter.is_triple() { 3 } else { 1 };
        for _ in 0..close_len {
            io.advance();
        }
        state.pop_delimiter();
        io.mark_end();
        return Some(Token::new(start, TokenKind::StringEnd));
    }

    if !valid.contains(TokenSet::STRING_CONTENT) {
        return None;
    }

    let start = io.mark();
    let mut content = Vec::new();

    loop {
        let Some(byte) = io.peek() else { break };

        if at_closing_delimiter(io, delimiter) {
            break;
        }

        if byte == b'\n' {
            if delimiter.is_triple() {
                io.advance();
                content.push(byte);
                continue;
            }
            // non-triple string meets a bare newline: yield, grammar surfaces
            // the unterminated-string error.
            break;
        }

        if delimiter.is_format() && (byte == b'{' || byte == b'}') {
            // single brace suspends content so the brace-escape rule (or
            // the grammar's hole entry) can run next invocation.
            break;
        }

        if byte == b'\\' {
            if delimiter.is_raw() {
                let next = io.peek_at(1);
                if next == Some(delimiter.quote_byte()) || matches!(next, Some(b'\n') | Some(b'\r')) {
                    io.advance();
                    content.push(byte);
                    if let Some(n) = io.peek() {
                        io.advance();
                        content.push(n);
                    }
                    continue;
                }
                io.advance();
                content.push(byte);
                continue;
            }

            if delimiter.is_bytes() && matches!(io.peek_at(1), Some(b'N') | Some(b'u') | Some(b'U')) {
                // yield before the unrecognized bytes-string escape so the
                // grammar can classify it.
                break;
            }

            // any other escape boundary: yield so the grammar layer owns
            // interpreting the escape.
            break;
        }

        io.advance();
        content.push(byte);
    }

    if content.is_empty() {
        return None;
    }

    io.mark_end();
    Some(Token::new(start, TokenKind::StringContent(String::from_utf8_lossy(&content).into_owned())))
}

/// Step 8 fallback: a bare prefix-then-quote pattern anywhere STRING_START
/// is grammar-valid, not gated by line-start context.
pub fn scan_start<IO: LexerIO>(state: &mut ScannerState, io: &mut IO, valid: TokenSet) -> Option<Token> {
    if !valid.contains(TokenSet::STRING_START) {
        return None;
    }
    let (prefix_len, quote) = detect_prefix_and_quote(io)?;
    let start = io.mark();
    Some(open_string(state, io, prefix_len, quote, start))
}

/// Shared by the generic string-start scan and the line-class predictor's
/// prefixed-string outcome: consumes `prefix_len` prefix bytes plus the
/// quote (tripled if doubled twice more), pushes the delimiter, and emits
/// STRING_START.
pub fn open_string<IO: LexerIO>(
    state: &mut ScannerState,
    io: &mut IO,
    prefix_len: usize,
    quote: u8,
    start: Marker,
) -> Token {
    let mut raw = false;
    let mut format = false;
    let mut bytes = false;
    for i in 0..prefix_len {
        match io.peek_at(i).unwrap_or(0).to_ascii_lowercase() {
            b'r' => raw = true,
            b'f' => format = true,
            b'b' => bytes = true,
            _ => {}
        }
    }
    for _ in 0..prefix_len {
        io.advance();
    }
    io.advance(); // opening quote
    let triple = io.peek() == Some(quote) && io.peek_at(1) == Some(quote);
    if triple {
        io.advance();
        io.advance();
    }
    let delimiter = Delimiter::new(quote, raw, format, bytes, triple);
    state.push_delimiter(delimiter);
    io.mark_end();
    Token::new(start, TokenKind::StringStart(delimiter))
}

/// Finds the length of a valid `{f,F,r,R,b,B,u,U}` prefix (0 to 3 bytes)
/// immediately followed by a quote, if one is present at the current
/// position.
pub fn detect_prefix_and_quote<IO: LexerIO + ?Sized>(io: &IO) -> Option<(usize, u8)> {
    for len in 0..=3usize {
        if let Some(quote @ (b'\'' | b'"')) = io.peek_at(len) {
            let all_prefix = (0..len).all(|i| {
                matches!(
                    io.peek_at(i).map(|b| b.to_ascii_lowercase()),
                    Some(b'f') | Some(b'r') | Some(b'b') | Some(b'u')
                )
            });
            if all_prefix {
                return Some((len, quote));
            }
            return None;
        }
        if !matches!(io.peek_at(len), Some(b) if is_identifier_continue(b)) {
            return None;
        }
    }
    None
}

/// `p`/`P`, optionally followed by one of `f/F/r/R`, consumed by the
/// path-prefix outcome. Returns the consumed length and resulting flags.
pub fn path_prefix(ident: &str) -> Option<PathPrefixFlags> {
    let lower = ident.to_ascii_lowercase();
    match lower.as_str() {
        "p" => Some(PathPrefixFlags::default()),
        "pf" => Some(PathPrefixFlags { format: true, raw: false }),
        "pr" => Some(PathPrefixFlags { raw: true, format: false }),
        _ => None,
    }
}

fn at_closing_delimiter<IO: LexerIO + ?Sized>(io: &IO, delimiter: Delimiter) -> bool {
    let quote = delimiter.quote_byte();
    if io.peek() != Some(quote) {
        return false;
    }
    if delimiter.is_triple() {
        io.peek_at(1) == Some(quote) && io.peek_at(2) == Some(quote)
    } else {
        true
    }
}
