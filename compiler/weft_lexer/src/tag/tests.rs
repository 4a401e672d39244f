use super::*;

// === RawTag discriminants ===

#[test]
fn repr_u8_semantic_ranges() {
    assert_eq!(RawTag::Ident as u8, 0);
    assert_eq!(RawTag::Assign as u8, 32);
    assert_eq!(RawTag::LeftParen as u8, 80);
    assert_eq!(RawTag::Whitespace as u8, 112);
    assert_eq!(RawTag::InvalidByte as u8, 240);
    assert_eq!(RawTag::Eof as u8, 255);
}

#[test]
fn tag_is_one_byte() {
    assert_eq!(std::mem::size_of::<RawTag>(), 1);
}

// === Categories ===

#[test]
fn comments_are_trivia() {
    for tag in [
        RawTag::LineComment,
        RawTag::BlockComment,
        RawTag::DocComment,
        RawTag::SpecialComment,
        RawTag::UnterminatedComment,
    ] {
        assert!(tag.is_trivia(), "{tag:?}");
        assert!(tag.is_comment(), "{tag:?}");
    }
    assert!(RawTag::Whitespace.is_trivia());
    assert!(!RawTag::Whitespace.is_comment());
    assert!(!RawTag::Ident.is_trivia());
}

#[test]
fn error_range_excludes_eof() {
    assert!(RawTag::UnterminatedString.is_error());
    assert!(!RawTag::Eof.is_error());
    assert!(!RawTag::Semicolon.is_error());
}

// === Lexeme ===

#[test]
fn fixed_lexemes() {
    assert_eq!(RawTag::LeftBrace.lexeme(), Some("{"));
    assert_eq!(RawTag::Ellipsis.lexeme(), Some("..."));
    assert_eq!(RawTag::Ident.lexeme(), None);
    assert_eq!(RawTag::Operator.lexeme(), None);
}
