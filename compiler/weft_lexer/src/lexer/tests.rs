use super::*;
use pretty_assertions::assert_eq;

#[test]
fn resolves_keywords_with_positions() {
    let source = "  public int x;";
    let tokens: Vec<Token> = Lexer::starting_at(source, 0)
        .filter(|t| !t.tag.is_trivia())
        .collect();
    assert_eq!(tokens[0].keyword, Some(Keyword::Public));
    assert_eq!(tokens[0].start, 2);
    assert_eq!(tokens[1].keyword, Some(Keyword::Int));
    assert!(tokens[2].is_ident());
    assert_eq!(tokens[2].text(source), "x");
    assert!(tokens[3].is(RawTag::Semicolon));
}

#[test]
fn significant_skips_comments() {
    let source = "/* a */ // b\n foo";
    let mut lexer = Lexer::starting_at(source, 0);
    let tok = lexer.next_significant();
    assert_eq!(tok.text(source), "foo");
    assert!(lexer.next_significant().is_eof());
}

#[test]
fn non_whitespace_keeps_comments() {
    let source = "  /** doc */ int";
    let mut lexer = Lexer::starting_at(source, 0);
    assert_eq!(lexer.next_non_whitespace().tag, RawTag::DocComment);
    assert!(lexer.next_non_whitespace().is_keyword(Keyword::Int));
}

#[test]
fn starting_mid_source() {
    let source = "int a; int b;";
    let mut lexer = Lexer::new(source, 7, source.len());
    let tok = lexer.next_significant();
    assert_eq!((tok.start, tok.keyword), (7, Some(Keyword::Int)));
}
