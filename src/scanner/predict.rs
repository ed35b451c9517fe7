//! Line-class predictor: the single-pass heuristic deciding whether a new
//! logical line is a Python expression or a shell command line, and which
//! of several macro/prefix variants applies.

use bitflags::bitflags;

use crate::dict;
use crate::error::Marker;
use crate::io::LexerIO;
use crate::scanner::scalars::{detect_prefix_and_quote, open_string, path_prefix};
use crate::scanner::state::ScannerState;
use crate::scanner::token::{Token, TokenKind, TokenSet};
use crate::scanner::utils::{is_horizontal_whitespace, is_identifier_continue, peek_identifier, peek_identifier_at};

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    struct Positive: u16 {
        const LEADING_PATH   = 1 << 0;
        const FLAG           = 1 << 1;
        const PIPE           = 1 << 2;
        const REDIRECT       = 1 << 3;
        const TRAILING_AMP   = 1 << 4;
        const ENV_ARG        = 1 << 5;
        const EVAL_ARG       = 1 << 6;
        const MID_MACRO      = 1 << 7;
        const SHELL_COMMAND  = 1 << 8;
    }
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    struct Negative: u16 {
        const ASSIGNMENT     = 1 << 0;
        const COMPARISON     = 1 << 1;
        const CALL_PARENS    = 1 << 2;
        const SUBSCRIPT      = 1 << 3;
        const ATTRIBUTE      = 1 << 4;
        const FUNCTION_MACRO = 1 << 5;
    }
}

/// Run the predictor at the first non-whitespace position of a new logical
/// line. Caller (the dispatcher) is responsible for confirming the
/// preconditions of §4.4: bracket-nesting zero, no active string, line
/// start, next character is not a bare quote.
pub fn predict<IO: LexerIO>(state: &mut ScannerState, io: &mut IO, valid: TokenSet) -> Option<Token> {
    let start = io.mark();

    if is_help_query(io) {
        return None;
    }

    if is_comma_only_line(io) {
        return (valid.contains(TokenSet::SUBPROCESS_START))
            .then(|| Token::new(start, TokenKind::SubprocessStart));
    }

    if io.peek() == Some(b'[') {
        return None;
    }

    if matches!(
        (io.peek_at(0), io.peek_at(1)),
        (Some(b'$'), Some(b'(')) | (Some(b'$'), Some(b'[')) | (Some(b'!'), Some(b'(')) | (Some(b'!'), Some(b'['))
    ) {
        return None;
    }

    if io.peek() == Some(b'@') {
        return predict_decorator(io, valid, start);
    }

    let ident = peek_identifier(&*io, 32);
    if !ident.is_empty() {
        let after = ident.len();

        if io.peek_at(after) == Some(b'!') {
            if io.peek_at(after + 1) == Some(b'(') {
                return None; // `ident!(` is a function macro, a negative signal
            }
            if matches!(io.peek_at(after + 1), Some(b) if is_horizontal_whitespace(b)) {
                if ident == "with" {
                    return valid.contains(TokenSet::BLOCK_MACRO_START).then(|| {
                        for _ in 0..=after {
                            io.advance();
                        }
                        io.mark_end();
                        Token::new(start, TokenKind::BlockMacroStart)
                    });
                }
                return valid.contains(TokenSet::SUBPROCESS_MACRO_START).then(|| {
                    for _ in 0..=after {
                        io.advance();
                    }
                    io.mark_end();
                    Token::new(start, TokenKind::SubprocessMacroStart(ident.clone()))
                });
            }
        }

        if ident.len() <= 3 && ident.bytes().all(|b| matches!(b.to_ascii_lowercase(), b'f' | b'r' | b'b' | b'u')) {
            if let Some((prefix_len, quote)) = detect_prefix_and_quote(io) {
                if prefix_len == after && matches!(io.peek_at(after), Some(b'\'') | Some(b'"')) {
                    if valid.contains(TokenSet::STRING_START) {
                        return Some(open_string(state, io, prefix_len, quote, start));
                    }
                    return None;
                }
            }
        }

        if matches!(io.peek_at(after), Some(b'\'') | Some(b'"')) {
            if let Some(flags) = path_prefix(&ident) {
                if valid.contains(TokenSet::PATH_PREFIX) {
                    for _ in 0..after {
                        io.advance();
                    }
                    io.mark_end();
                    return Some(Token::new(start, TokenKind::PathPrefix(flags)));
                }
            }
        }

        let with_bang = io.peek_at(after) == Some(b'!');
        if dict::is_reserved_keyword(&ident) && !(ident == "with" && with_bang) {
            return None;
        }
    }

    match accumulate_signals(io, &ident) {
        Verdict::Shell => valid
            .contains(TokenSet::SUBPROCESS_START)
            .then(|| Token::new(start, TokenKind::SubprocessStart)),
        Verdict::Python => None,
    }
}

enum Verdict {
    Shell,
    Python,
}

fn accumulate_signals<IO: LexerIO + ?Sized>(io: &IO, leading_ident: &str) -> Verdict {
    let mut positive = Positive::empty();
    let mut negative = Negative::empty();

    if matches!(io.peek_at(0), Some(b'/'))
        || (io.peek_at(0) == Some(b'.') && io.peek_at(1) == Some(b'/'))
        || (io.peek_at(0) == Some(b'~') && io.peek_at(1) == Some(b'/'))
    {
        positive |= Positive::LEADING_PATH;
    }
    if dict::is_shell_command(leading_ident) {
        positive |= Positive::SHELL_COMMAND;
    }

    let mut offset = 0usize;
    let mut after_whitespace = offset == 0;
    let mut eval_depth = 0i32;
    let mut prev_ident_end = false;

    while let Some(byte) = io.peek_at(offset) {
        if byte == b'\n' {
            break;
        }
        match byte {
            b' ' | b'\t' => {
                after_whitespace = true;
                offset += 1;
                prev_ident_end = false;
            }
            b'=' => {
                if io.peek_at(offset + 1) == Some(b'=') {
                    negative |= Negative::COMPARISON;
                    offset += 2;
                } else {
                    // `--flag=value` has no space around `=`; only a
                    // space-padded `=` reads as a Python assignment.
                    let preceded_by_space = offset > 0 && matches!(io.peek_at(offset - 1), Some(b' ') | Some(b'\t'));
                    if eval_depth == 0 && preceded_by_space {
                        negative |= Negative::ASSIGNMENT;
                    }
                    offset += 1;
                }
                after_whitespace = false;
                prev_ident_end = false;
            }
            b'!' if io.peek_at(offset + 1) == Some(b'=') => {
                negative |= Negative::COMPARISON;
                offset += 2;
                after_whitespace = false;
                prev_ident_end = false;
            }
            b'<' | b'>' => {
                if io.peek_at(offset + 1) == Some(b'=') {
                    negative |= Negative::COMPARISON;
                    offset += 2;
                } else {
                    positive |= Positive::REDIRECT;
                    offset += 1;
                    if io.peek_at(offset) == Some(byte) {
                        offset += 1;
                    }
                }
                after_whitespace = false;
                prev_ident_end = false;
            }
            b':' if io.peek_at(offset + 1) == Some(b'=') => {
                negative |= Negative::COMPARISON;
                offset += 2;
                after_whitespace = false;
                prev_ident_end = false;
            }
            b'|' => {
                positive |= Positive::PIPE;
                offset += 1;
                if io.peek_at(offset) == Some(b'|') {
                    offset += 1;
                }
                after_whitespace = false;
                prev_ident_end = false;
            }
            b'&' => {
                positive |= Positive::TRAILING_AMP;
                offset += 1;
                after_whitespace = false;
                prev_ident_end = false;
            }
            b'-' if after_whitespace => {
                let mut look = offset + 1;
                if io.peek_at(look) == Some(b'-') {
                    look += 1;
                }
                if matches!(io.peek_at(look), Some(b) if b.is_ascii_alphabetic()) {
                    positive |= Positive::FLAG;
                }
                offset += 1;
                after_whitespace = false;
                prev_ident_end = false;
            }
            b'$' => {
                let after_whitespace_signal = offset > 0 && after_whitespace;
                if after_whitespace_signal
                    && (matches!(io.peek_at(offset + 1), Some(b'(') | Some(b'['))
                        || matches!(io.peek_at(offset + 1), Some(b) if b.is_ascii_alphabetic() || b == b'_'))
                {
                    positive |= Positive::ENV_ARG;
                }
                offset += 1;
                after_whitespace = false;
                prev_ident_end = false;
            }
            b'@' => {
                if io.peek_at(offset + 1) == Some(b'$') && io.peek_at(offset + 2) == Some(b'(') {
                    positive |= Positive::ENV_ARG;
                    offset += 3;
                } else if io.peek_at(offset + 1) == Some(b'(') {
                    positive |= Positive::EVAL_ARG;
                    eval_depth += 1;
                    offset += 2;
                } else {
                    offset += 1;
                }
                after_whitespace = false;
                prev_ident_end = false;
            }
            b'(' => {
                if eval_depth > 0 {
                    eval_depth += 1;
                } else if prev_ident_end {
                    negative |= Negative::CALL_PARENS;
                }
                offset += 1;
                after_whitespace = false;
                prev_ident_end = false;
            }
            b')' => {
                if eval_depth > 0 {
                    eval_depth -= 1;
                }
                offset += 1;
                after_whitespace = false;
                prev_ident_end = false;
            }
            b'[' => {
                if prev_ident_end {
                    negative |= Negative::SUBSCRIPT;
                }
                offset += 1;
                after_whitespace = false;
                prev_ident_end = false;
            }
            b'.' => {
                if prev_ident_end {
                    negative |= Negative::ATTRIBUTE;
                }
                offset += 1;
                after_whitespace = false;
                prev_ident_end = false;
            }
            _ if is_identifier_continue(byte) && !byte.is_ascii_digit() => {
                let ident_start = offset;
                while matches!(io.peek_at(offset), Some(b) if is_identifier_continue(b)) {
                    offset += 1;
                }
                if io.peek_at(offset) == Some(b'!') {
                    if io.peek_at(offset + 1) == Some(b'(') {
                        negative |= Negative::FUNCTION_MACRO;
                        offset += 1;
                    } else if matches!(io.peek_at(offset + 1), Some(b) if is_horizontal_whitespace(b)) && ident_start != 0 {
                        positive |= Positive::MID_MACRO;
                        offset += 1;
                    }
                }
                prev_ident_end = true;
                after_whitespace = false;
            }
            _ => {
                offset += 1;
                after_whitespace = false;
                prev_ident_end = false;
            }
        }
    }

    if !negative.is_empty() {
        log::debug!("predictor: none, negative signals {negative:?}");
        return Verdict::Python;
    }
    if !positive.is_empty() {
        log::debug!("predictor: SUBPROCESS_START, positive signals {positive:?}");
        return Verdict::Shell;
    }
    if dict::is_shell_command(leading_ident) {
        log::debug!("predictor: SUBPROCESS_START, leading identifier '{leading_ident}' is a known shell command");
        return Verdict::Shell;
    }
    Verdict::Python
}

fn is_help_query<IO: LexerIO + ?Sized>(io: &IO) -> bool {
    let mut offset = 0usize;
    let mut seen_non_question = false;
    loop {
        match io.peek_at(offset) {
            None | Some(b'\n') => return false,
            Some(b'?') => {
                if !seen_non_question {
                    return false;
                }
                let mut after = offset + 1;
                if io.peek_at(after) == Some(b'?') {
                    after += 1;
                }
                loop {
                    match io.peek_at(after) {
                        None | Some(b'\n') => return true,
                        Some(b) if is_horizontal_whitespace(b) => after += 1,
                        _ => return false,
                    }
                }
            }
            Some(_) => {
                seen_non_question = true;
                offset += 1;
            }
        }
    }
}

fn is_comma_only_line<IO: LexerIO + ?Sized>(io: &IO) -> bool {
    if io.peek() != Some(b',') {
        return false;
    }
    let mut offset = 1;
    loop {
        match io.peek_at(offset) {
            None | Some(b'\n') => return true,
            Some(b) if is_horizontal_whitespace(b) => offset += 1,
            _ => return false,
        }
    }
}

fn predict_decorator<IO: LexerIO + ?Sized>(io: &IO, valid: TokenSet, start: Marker) -> Option<Token> {
    let ident = peek_identifier_at(io, 1, 32);
    if ident.is_empty() {
        return None;
    }
    let after = 1 + ident.len();
    match io.peek_at(after) {
        Some(b'(') | Some(b'.') => None,
        Some(b) if is_horizontal_whitespace(b) => {
            let mut look = after;
            while matches!(io.peek_at(look), Some(b) if is_horizontal_whitespace(b)) {
                look += 1;
            }
            let looks_shell = matches!(io.peek_at(look), Some(b'/'))
                || (io.peek_at(look) == Some(b'.') && io.peek_at(look + 1) == Some(b'/'))
                || (io.peek_at(look) == Some(b'~') && io.peek_at(look + 1) == Some(b'/'))
                || io.peek_at(look) == Some(b'-')
                || {
                    let word = peek_identifier_at(io, look, 32);
                    !word.is_empty() && dict::is_shell_command(&word)
                };
            (looks_shell && valid.contains(TokenSet::SUBPROCESS_START))
                .then(|| Token::new(start, TokenKind::SubprocessStart))
        }
        _ => None,
    }
}
