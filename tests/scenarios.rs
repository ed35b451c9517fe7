//! End-to-end token-stream scenarios, driven through `SliceLexerIO`.
//!
//! The scanner never owns bytes it doesn't emit as tokens — grammar-owned
//! spans (expression bodies, subprocess argument text) are stepped over
//! directly via `advance()` to simulate the host consuming them, exactly as
//! a GLR parser driving this scanner would.

use indoc::indoc;
use pretty_assertions::assert_eq;
use xonsh_scan::{LexerIO, Scanner, SliceLexerIO, TokenKind, TokenSet};

fn advance(io: &mut SliceLexerIO, n: usize) {
    for _ in 0..n {
        io.advance().expect("advancing past a grammar-owned span ran off the end of input");
    }
}

#[test]
fn scenario_subprocess_line() {
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str("ls -la\n");

    let start = scanner.scan(&mut io, TokenSet::SUBPROCESS_START).unwrap();
    assert_eq!(*start.kind(), TokenKind::SubprocessStart);

    advance(&mut io, "ls -la".len());
    let newline = scanner.scan(&mut io, TokenSet::NEWLINE).unwrap();
    assert_eq!(*newline.kind(), TokenKind::Newline);
}

#[test]
fn scenario_comparison_is_not_subprocess() {
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str("x == 1\n");

    assert!(scanner.scan(&mut io, TokenSet::SUBPROCESS_START).is_none());

    advance(&mut io, "x == 1".len());
    let newline = scanner.scan(&mut io, TokenSet::NEWLINE).unwrap();
    assert_eq!(*newline.kind(), TokenKind::Newline);
}

#[test]
fn scenario_format_string_with_hole() {
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str("f\"hi {name}!\"\n");

    let start = scanner.scan(&mut io, TokenSet::STRING_START).unwrap();
    match start.kind() {
        TokenKind::StringStart(d) => assert!(d.is_format()),
        other => panic!("unexpected {other:?}"),
    }

    let content = scanner.scan(&mut io, TokenSet::STRING_CONTENT).unwrap();
    match content.kind() {
        TokenKind::StringContent(s) => assert_eq!(s, "hi "),
        other => panic!("unexpected {other:?}"),
    }

    // grammar consumes the `{name}` hole
    advance(&mut io, "{name}".len());

    let tail = scanner.scan(&mut io, TokenSet::STRING_CONTENT).unwrap();
    match tail.kind() {
        TokenKind::StringContent(s) => assert_eq!(s, "!"),
        other => panic!("unexpected {other:?}"),
    }

    let end = scanner.scan(&mut io, TokenSet::STRING_END).unwrap();
    assert_eq!(*end.kind(), TokenKind::StringEnd);

    let newline = scanner.scan(&mut io, TokenSet::NEWLINE).unwrap();
    assert_eq!(*newline.kind(), TokenKind::Newline);
}

#[test]
fn scenario_block_macro_with_indented_body() {
    let source = indoc! {"
        with! open('x') as f:
            pass
    "};
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str(source);

    let start = scanner.scan(&mut io, TokenSet::BLOCK_MACRO_START).unwrap();
    assert_eq!(*start.kind(), TokenKind::BlockMacroStart);

    // grammar consumes the header expression up to (not including) the newline
    advance(&mut io, " open('x') as f:".len());

    let newline = scanner.scan(&mut io, TokenSet::NEWLINE).unwrap();
    assert_eq!(*newline.kind(), TokenKind::Newline);

    let indent = scanner.scan(&mut io, TokenSet::INDENT).unwrap();
    assert_eq!(*indent.kind(), TokenKind::Indent);

    advance(&mut io, "pass".len());

    let newline2 = scanner.scan(&mut io, TokenSet::NEWLINE).unwrap();
    assert_eq!(*newline2.kind(), TokenKind::Newline);

    let dedent = scanner.scan(&mut io, TokenSet::DEDENT).unwrap();
    assert_eq!(*dedent.kind(), TokenKind::Dedent);
}

#[test]
fn scenario_piped_subprocess_with_logical_and() {
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str("cat file | grep foo && echo ok\n");

    let start = scanner.scan(&mut io, TokenSet::SUBPROCESS_START).unwrap();
    assert_eq!(*start.kind(), TokenKind::SubprocessStart);

    advance(&mut io, "cat file | grep foo ".len());

    let and = scanner.scan(&mut io, TokenSet::LOGICAL_AND).unwrap();
    assert_eq!(*and.kind(), TokenKind::LogicalAnd);

    advance(&mut io, " echo ok".len());

    let newline = scanner.scan(&mut io, TokenSet::NEWLINE).unwrap();
    assert_eq!(*newline.kind(), TokenKind::Newline);
}

#[test]
fn scenario_path_prefixed_string() {
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str("p'~/logs'\n");

    let prefix = scanner.scan(&mut io, TokenSet::PATH_PREFIX).unwrap();
    assert!(matches!(prefix.kind(), TokenKind::PathPrefix(_)));

    let start = scanner.scan(&mut io, TokenSet::STRING_START).unwrap();
    match start.kind() {
        TokenKind::StringStart(d) => assert!(!d.is_raw() && !d.is_format()),
        other => panic!("unexpected {other:?}"),
    }

    let content = scanner.scan(&mut io, TokenSet::STRING_CONTENT).unwrap();
    match content.kind() {
        TokenKind::StringContent(s) => assert_eq!(s, "~/logs"),
        other => panic!("unexpected {other:?}"),
    }

    let end = scanner.scan(&mut io, TokenSet::STRING_END).unwrap();
    assert_eq!(*end.kind(), TokenKind::StringEnd);

    let newline = scanner.scan(&mut io, TokenSet::NEWLINE).unwrap();
    assert_eq!(*newline.kind(), TokenKind::Newline);
}

#[test]
fn boundary_call_parens_suppresses_subprocess() {
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str("rm(path)\n");
    assert!(scanner.scan(&mut io, TokenSet::SUBPROCESS_START).is_none());
}

#[test]
fn boundary_raw_format_prefix_consumed_by_predictor() {
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str("rf\"raw\"\n");
    let start = scanner.scan(&mut io, TokenSet::STRING_START).unwrap();
    match start.kind() {
        TokenKind::StringStart(d) => {
            assert!(d.is_raw());
            assert!(d.is_format());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn boundary_triple_quote_requires_three_to_close() {
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str("'''a'b'''\n");
    let start = scanner.scan(&mut io, TokenSet::STRING_START).unwrap();
    match start.kind() {
        TokenKind::StringStart(d) => assert!(d.is_triple()),
        other => panic!("unexpected {other:?}"),
    }
    let content = scanner.scan(&mut io, TokenSet::STRING_CONTENT).unwrap();
    match content.kind() {
        TokenKind::StringContent(s) => assert_eq!(s, "a'b"),
        other => panic!("unexpected {other:?}"),
    }
    let end = scanner.scan(&mut io, TokenSet::STRING_END).unwrap();
    assert_eq!(*end.kind(), TokenKind::StringEnd);
}

#[test]
fn boundary_trailing_comment_leaves_indent_stack_alone() {
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str("# trailing\n");
    let comment = scanner.scan(&mut io, TokenSet::COMMENT).unwrap();
    assert_eq!(*comment.kind(), TokenKind::Comment);
    assert_eq!(scanner.state().indent_depth(), 1);
}

#[test]
fn boundary_line_continuation_yields_no_token() {
    let mut scanner = Scanner::new();
    let mut io = SliceLexerIO::from_str("\\\nrest");
    assert!(scanner.scan(&mut io, TokenSet::all()).is_none());
}
