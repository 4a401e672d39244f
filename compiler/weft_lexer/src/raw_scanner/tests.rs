#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Helper: scan a source string and collect all tokens (excluding Eof).
fn scan(source: &str) -> Vec<RawToken> {
    let mut scanner = RawScanner::new(Cursor::new(source, 0, source.len()));
    let mut tokens = Vec::new();
    loop {
        let tok = scanner.next_token();
        if tok.tag == RawTag::Eof {
            break;
        }
        tokens.push(tok);
    }
    tokens
}

/// Helper: scan and return non-whitespace tags only.
fn scan_tags(source: &str) -> Vec<RawTag> {
    scan(source)
        .iter()
        .map(|t| t.tag)
        .filter(|t| *t != RawTag::Whitespace)
        .collect()
}

// ─── Structure ────────────────────────────────────────────────────

#[test]
fn class_header() {
    assert_eq!(
        scan_tags("class Foo<T> extends Bar {"),
        vec![
            RawTag::Ident,
            RawTag::Ident,
            RawTag::Less,
            RawTag::Ident,
            RawTag::Greater,
            RawTag::Ident,
            RawTag::Ident,
            RawTag::LeftBrace,
        ]
    );
}

#[test]
fn nested_generics_close_separately() {
    assert_eq!(
        scan_tags("Map<K, List<V>>"),
        vec![
            RawTag::Ident,
            RawTag::Less,
            RawTag::Ident,
            RawTag::Comma,
            RawTag::Ident,
            RawTag::Less,
            RawTag::Ident,
            RawTag::Greater,
            RawTag::Greater,
        ]
    );
}

#[test]
fn operators_and_assignment() {
    assert_eq!(
        scan_tags("a = b == c += d -> e"),
        vec![
            RawTag::Ident,
            RawTag::Assign,
            RawTag::Ident,
            RawTag::Operator,
            RawTag::Ident,
            RawTag::Operator,
            RawTag::Ident,
            RawTag::Operator,
            RawTag::Ident,
        ]
    );
}

#[test]
fn numbers() {
    let tokens = scan("1.5e-3f 0x1F .25");
    let lens: Vec<u32> = tokens
        .iter()
        .filter(|t| t.tag == RawTag::Number)
        .map(|t| t.len)
        .collect();
    assert_eq!(lens, vec![7, 4, 3]);
}

#[test]
fn varargs_ellipsis() {
    assert_eq!(
        scan_tags("String... args"),
        vec![RawTag::Ident, RawTag::Ellipsis, RawTag::Ident]
    );
}

// ─── Comments ─────────────────────────────────────────────────────

#[test]
fn comment_styles() {
    assert_eq!(
        scan_tags("// line\n/* block */ /** doc */ /*# special */ /**/"),
        vec![
            RawTag::LineComment,
            RawTag::BlockComment,
            RawTag::DocComment,
            RawTag::SpecialComment,
            RawTag::BlockComment,
        ]
    );
}

#[test]
fn line_comment_excludes_newline() {
    let tokens = scan("// abc\nx");
    assert_eq!(tokens[0].len, 6);
    assert_eq!(tokens[1].tag, RawTag::Whitespace);
}

#[test]
fn unterminated_comment_runs_to_end() {
    let tokens = scan("a /* never closed");
    assert_eq!(tokens.last().unwrap().tag, RawTag::UnterminatedComment);
    assert_eq!(tokens.last().unwrap().len, 15);
}

#[test]
fn operator_stops_before_comment() {
    assert_eq!(
        scan_tags("a +// note"),
        vec![RawTag::Ident, RawTag::Operator, RawTag::LineComment]
    );
}

// ─── Literals ─────────────────────────────────────────────────────

#[test]
fn string_with_escapes() {
    let tokens = scan(r#""a\"b" x"#);
    assert_eq!(tokens[0].tag, RawTag::String);
    assert_eq!(tokens[0].len, 6);
}

#[test]
fn string_stops_at_newline() {
    let tokens = scan("\"abc\nx");
    assert_eq!(tokens[0].tag, RawTag::UnterminatedString);
    assert_eq!(tokens[0].len, 4);
}

#[test]
fn char_literals() {
    assert_eq!(
        scan_tags(r"'a' '\n' '"),
        vec![RawTag::Char, RawTag::Char, RawTag::UnterminatedChar]
    );
}

#[test]
fn non_ascii_identifier() {
    let tokens = scan("größe = 1");
    assert_eq!(tokens[0].tag, RawTag::Ident);
    assert_eq!(tokens[0].len as usize, "größe".len());
}

#[test]
fn window_limits_scan() {
    let source = "int x = 1;";
    let mut scanner = RawScanner::new(Cursor::new(source, 4, 5));
    assert_eq!(scanner.next_token(), RawToken { tag: RawTag::Ident, len: 1 });
    assert_eq!(scanner.next_token().tag, RawTag::Eof);
    assert_eq!(scanner.next_token().tag, RawTag::Eof);
}

// ─── Property Tests ───────────────────────────────────────────────

proptest! {
    #[test]
    fn tokens_cover_every_byte(source in "\\PC{0,200}") {
        let total: usize = scan(&source).iter().map(|t| t.len as usize).sum();
        prop_assert_eq!(total, source.len());
    }

    #[test]
    fn tokens_end_on_char_boundaries(source in "\\PC{0,120}") {
        let mut pos = 0;
        for tok in scan(&source) {
            prop_assert!(tok.len > 0);
            pos += tok.len as usize;
            prop_assert!(source.is_char_boundary(pos));
        }
    }
}
