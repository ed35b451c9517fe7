//! Operator disambiguator: `&&`/`&`/`||` and the keyword `and`/`or` forms.

use crate::io::LexerIO;
use crate::scanner::token::{Token, TokenKind, TokenSet};
use crate::scanner::utils::is_identifier_continue;

/// `&&`, single `&`, and `||`. Never consumes a lone `&` when `&&` was
/// present but `LOGICAL_AND` wasn't grammar-valid — that would corrupt the
/// next invocation's view of the source.
pub fn scan_symbol<IO: LexerIO>(io: &mut IO, valid: TokenSet) -> Option<Token> {
    let start = io.mark();

    match io.peek()? {
        b'&' => {
            if io.peek_at(1) == Some(b'&') {
                if valid.contains(TokenSet::LOGICAL_AND) {
                    io.advance();
                    io.advance();
                    io.mark_end();
                    return Some(Token::new(start, TokenKind::LogicalAnd));
                }
                return None;
            }
            if valid.contains(TokenSet::BACKGROUND_AMP) {
                io.advance();
                io.mark_end();
                return Some(Token::new(start, TokenKind::BackgroundAmp));
            }
            None
        }
        b'|' if io.peek_at(1) == Some(b'|') => {
            if valid.contains(TokenSet::LOGICAL_OR) {
                io.advance();
                io.advance();
                io.mark_end();
                return Some(Token::new(start, TokenKind::LogicalOr));
            }
            None
        }
        _ => None,
    }
}

/// Literal `and`/`or` keyword operators, only in subprocess contexts where
/// the grammar declares them grammar-valid.
pub fn scan_keyword<IO: LexerIO>(io: &mut IO, valid: TokenSet) -> Option<Token> {
    if valid.contains(TokenSet::KEYWORD_AND) && matches_word(io, "and") {
        let start = io.mark();
        for _ in 0.."and".len() {
            io.advance();
        }
        io.mark_end();
        return Some(Token::new(start, TokenKind::KeywordAnd));
    }
    if valid.contains(TokenSet::KEYWORD_OR) && matches_word(io, "or") {
        let start = io.mark();
        for _ in 0.."or".len() {
            io.advance();
        }
        io.mark_end();
        return Some(Token::new(start, TokenKind::KeywordOr));
    }
    None
}

fn matches_word<IO: LexerIO + ?Sized>(io: &IO, word: &str) -> bool {
    for (i, expected) in word.bytes().enumerate() {
        if io.peek_at(i) != Some(expected) {
            return false;
        }
    }
    !matches!(io.peek_at(word.len()), Some(b) if is_identifier_continue(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SliceLexerIO;

    #[test]
    fn double_amp_emits_logical_and() {
        let mut io = SliceLexerIO::from_str("&& x");
        let token = scan_symbol(&mut io, TokenSet::LOGICAL_AND).unwrap();
        assert_eq!(*token.kind(), TokenKind::LogicalAnd);
    }

    #[test]
    fn double_amp_without_valid_logical_and_consumes_nothing() {
        let mut io = SliceLexerIO::from_str("&& x");
        assert!(scan_symbol(&mut io, TokenSet::BACKGROUND_AMP).is_none());
        assert_eq!(io.peek(), Some(b'&'));
    }

    #[test]
    fn single_amp_emits_background() {
        let mut io = SliceLexerIO::from_str("& x");
        let token = scan_symbol(&mut io, TokenSet::BACKGROUND_AMP).unwrap();
        assert_eq!(*token.kind(), TokenKind::BackgroundAmp);
    }

    #[test]
    fn keyword_and_requires_word_boundary() {
        let mut io = SliceLexerIO::from_str("android");
        assert!(scan_keyword(&mut io, TokenSet::KEYWORD_AND).is_none());
    }

    #[test]
    fn keyword_and_matches_at_boundary() {
        let mut io = SliceLexerIO::from_str("and x");
        let token = scan_keyword(&mut io, TokenSet::KEYWORD_AND).unwrap();
        assert_eq!(*token.kind(), TokenKind::KeywordAnd);
    }
}
