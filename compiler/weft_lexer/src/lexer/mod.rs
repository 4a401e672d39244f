//! Positioned tokens with keyword resolution.

use crate::cursor::Cursor;
use crate::keyword::Keyword;
use crate::raw_scanner::RawScanner;
use crate::tag::RawTag;

/// A token at an absolute document position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub tag: RawTag,
    /// Set when an identifier is a reserved word.
    pub keyword: Option<Keyword>,
    pub start: usize,
    pub len: usize,
}

impl Token {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    pub fn is(&self, tag: RawTag) -> bool {
        self.tag == tag
    }

    #[inline]
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.keyword == Some(kw)
    }

    /// A plain (non-reserved) identifier.
    #[inline]
    pub fn is_ident(&self) -> bool {
        self.tag == RawTag::Ident && self.keyword.is_none()
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.tag == RawTag::Eof
    }

    /// Source text of the token.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start..self.end()).unwrap_or("")
    }
}

/// Token stream over a window of the document.
pub struct Lexer<'a> {
    source: &'a str,
    scanner: RawScanner<'a>,
}

impl<'a> Lexer<'a> {
    /// Lex `source[start..end]`, reporting absolute positions.
    pub fn new(source: &'a str, start: usize, end: usize) -> Self {
        Lexer {
            source,
            scanner: RawScanner::new(Cursor::new(source, start, end)),
        }
    }

    /// Lex from `start` to the end of the source.
    pub fn starting_at(source: &'a str, start: usize) -> Self {
        Self::new(source, start, source.len())
    }

    /// Next token, trivia included.
    pub fn next_token(&mut self) -> Token {
        let start = self.scanner.pos();
        let raw = self.scanner.next_token();
        let len = raw.len as usize;
        let keyword = if raw.tag == RawTag::Ident {
            self.source
                .get(start..start + len)
                .and_then(Keyword::from_ident)
        } else {
            None
        };
        Token {
            tag: raw.tag,
            keyword,
            start,
            len,
        }
    }

    /// Next token that is not whitespace. Comments are returned.
    pub fn next_non_whitespace(&mut self) -> Token {
        loop {
            let tok = self.next_token();
            if tok.tag != RawTag::Whitespace {
                return tok;
            }
        }
    }

    /// Next token that is neither whitespace nor a comment.
    pub fn next_significant(&mut self) -> Token {
        loop {
            let tok = self.next_token();
            if !tok.tag.is_trivia() {
                return tok;
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let tok = self.next_token();
        (!tok.is_eof()).then_some(tok)
    }
}

#[cfg(test)]
mod tests;
