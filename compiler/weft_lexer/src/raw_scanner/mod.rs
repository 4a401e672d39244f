//! Hand-written raw scanner producing `(RawTag, len)` pairs.
//!
//! The scanner never allocates and never fails: malformed input becomes an
//! error tag (`UnterminatedString`, `InvalidByte`, ...) covering the bytes
//! consumed, so every byte of the window belongs to exactly one token.
//!
//! # Design
//!
//! Dispatch is on the first byte. Comment and literal bodies are located
//! with `memchr` rather than byte-by-byte loops.

use memchr::{memchr, memchr3, memmem};

use crate::cursor::Cursor;
use crate::tag::{RawTag, RawToken};

/// Allocation-free scanner over a [`Cursor`] window.
pub struct RawScanner<'a> {
    cursor: Cursor<'a>,
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

#[inline]
fn is_operator_byte(b: u8) -> bool {
    matches!(
        b,
        b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' | b'!' | b'~' | b'=' | b'<' | b'>'
    )
}

impl<'a> RawScanner<'a> {
    pub fn new(cursor: Cursor<'a>) -> Self {
        RawScanner { cursor }
    }

    /// Absolute position of the next token.
    #[inline]
    pub fn pos(&self) -> usize {
        self.cursor.pos()
    }

    /// Produce the next raw token.
    ///
    /// Returns `RawTag::Eof` with `len == 0` at the window end, and keeps
    /// returning it on further calls.
    pub fn next_token(&mut self) -> RawToken {
        let start = self.cursor.pos();
        if self.cursor.is_eof() {
            return RawToken {
                tag: RawTag::Eof,
                len: 0,
            };
        }
        let tag = match self.cursor.current() {
            b' ' | b'\t' | b'\n' | b'\r' | 0x0c => self.whitespace(),
            b'/' => self.slash_or_comment(),
            b'"' => self.string(),
            b'\'' => self.char_literal(),
            b'0'..=b'9' => self.number(),
            b'.' => self.dot(),
            b'(' => self.single(RawTag::LeftParen),
            b')' => self.single(RawTag::RightParen),
            b'[' => self.single(RawTag::LeftBracket),
            b']' => self.single(RawTag::RightBracket),
            b'{' => self.single(RawTag::LeftBrace),
            b'}' => self.single(RawTag::RightBrace),
            b';' => self.single(RawTag::Semicolon),
            b',' => self.single(RawTag::Comma),
            b'@' => self.single(RawTag::At),
            b'?' => self.single(RawTag::Question),
            b':' => self.colon(),
            // Angle brackets stay single so nested generics close one at a time.
            b'<' => self.single(RawTag::Less),
            b'>' => self.single(RawTag::Greater),
            b'=' => self.equal(),
            b if is_operator_byte(b) => self.operator(),
            b if is_ident_start(b) => self.identifier(),
            _ => self.single(RawTag::InvalidByte),
        };
        RawToken {
            tag,
            len: token_len(start, self.cursor.pos()),
        }
    }

    // ─── Trivia ───────────────────────────────────────────────────

    fn whitespace(&mut self) -> RawTag {
        self.cursor
            .eat_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c));
        RawTag::Whitespace
    }

    fn slash_or_comment(&mut self) -> RawTag {
        match self.cursor.peek_at(1) {
            b'/' => {
                match memchr(b'\n', self.cursor.rest()) {
                    Some(n) => self.cursor.advance_n(n),
                    None => self.cursor.skip_to_end(),
                }
                RawTag::LineComment
            }
            b'*' => self.block_comment(),
            _ => self.operator(),
        }
    }

    fn block_comment(&mut self) -> RawTag {
        let tag = match (self.cursor.peek_at(2), self.cursor.peek_at(3)) {
            // `/**/` is an empty ordinary comment, not a doc comment.
            (b'*', b'/') => RawTag::BlockComment,
            (b'*', _) => RawTag::DocComment,
            (b'#', _) => RawTag::SpecialComment,
            _ => RawTag::BlockComment,
        };
        self.cursor.advance_n(2);
        match memmem::find(self.cursor.rest(), b"*/") {
            Some(n) => {
                self.cursor.advance_n(n + 2);
                tag
            }
            None => {
                self.cursor.skip_to_end();
                RawTag::UnterminatedComment
            }
        }
    }

    // ─── Literals ─────────────────────────────────────────────────

    /// Quoted literal body shared by strings and chars. Stops before a
    /// newline, which leaves the literal unterminated.
    fn quoted(&mut self, quote: u8, ok: RawTag, unterminated: RawTag) -> RawTag {
        self.cursor.advance();
        loop {
            let rest = self.cursor.rest();
            match memchr3(quote, b'\\', b'\n', rest) {
                Some(n) if rest[n] == quote => {
                    self.cursor.advance_n(n + 1);
                    return ok;
                }
                Some(n) if rest[n] == b'\\' => {
                    // Never skip a newline as an escaped character.
                    let skip = if rest.get(n + 1) == Some(&b'\n') { 1 } else { 2 };
                    self.cursor.advance_n(n + skip);
                }
                Some(n) => {
                    self.cursor.advance_n(n);
                    return unterminated;
                }
                None => {
                    self.cursor.skip_to_end();
                    return unterminated;
                }
            }
        }
    }

    fn string(&mut self) -> RawTag {
        self.quoted(b'"', RawTag::String, RawTag::UnterminatedString)
    }

    fn char_literal(&mut self) -> RawTag {
        self.quoted(b'\'', RawTag::Char, RawTag::UnterminatedChar)
    }

    fn number(&mut self) -> RawTag {
        self.cursor.advance();
        loop {
            let b = self.cursor.current();
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.cursor.advance();
            } else if b == b'.' && self.cursor.peek_at(1).is_ascii_digit() {
                self.cursor.advance_n(2);
            } else if (b == b'+' || b == b'-')
                && matches!(self.cursor.prev(), b'e' | b'E' | b'p' | b'P')
                && self.cursor.peek_at(1).is_ascii_digit()
            {
                self.cursor.advance();
            } else {
                break;
            }
        }
        RawTag::Number
    }

    // ─── Identifiers & Punctuation ────────────────────────────────

    fn identifier(&mut self) -> RawTag {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        RawTag::Ident
    }

    fn dot(&mut self) -> RawTag {
        if self.cursor.peek_at(1).is_ascii_digit() {
            return self.number();
        }
        if self.cursor.peek_at(1) == b'.' && self.cursor.peek_at(2) == b'.' {
            self.cursor.advance_n(3);
            return RawTag::Ellipsis;
        }
        self.single(RawTag::Dot)
    }

    fn colon(&mut self) -> RawTag {
        if self.cursor.peek_at(1) == b':' {
            self.cursor.advance_n(2);
            return RawTag::Operator;
        }
        self.single(RawTag::Colon)
    }

    fn equal(&mut self) -> RawTag {
        if self.cursor.peek_at(1) == b'=' {
            self.cursor.advance_n(2);
            return RawTag::Operator;
        }
        self.single(RawTag::Assign)
    }

    /// Greedy run of operator bytes, stopping before a comment opener or an
    /// angle bracket so generics and comments scan on their own.
    fn operator(&mut self) -> RawTag {
        if self.cursor.current() == b'-' && self.cursor.peek_at(1) == b'>' {
            self.cursor.advance_n(2);
            return RawTag::Operator;
        }
        self.cursor.advance();
        loop {
            let b = self.cursor.current();
            let opens_comment = b == b'/' && matches!(self.cursor.peek_at(1), b'/' | b'*');
            if !is_operator_byte(b) || b == b'<' || b == b'>' || opens_comment {
                break;
            }
            self.cursor.advance();
        }
        RawTag::Operator
    }

    #[inline]
    fn single(&mut self, tag: RawTag) -> RawTag {
        self.cursor.advance();
        tag
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "a single token never exceeds 4 GiB"
)]
#[inline]
fn token_len(start: usize, end: usize) -> u32 {
    (end - start) as u32
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
