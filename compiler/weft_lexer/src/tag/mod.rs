//! Raw token tags.

/// Kind of a raw token.
///
/// Discriminants are grouped by category so range checks stay cheap.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RawTag {
    // Identifiers & Literals: 0-15
    Ident = 0,
    Number = 1,
    String = 2,
    Char = 3,

    // Operators: 32-47
    Assign = 32,
    Less = 33,
    Greater = 34,
    Question = 35,
    Colon = 36,
    Dot = 37,
    Ellipsis = 38,
    /// Any other operator run (`+=`, `==`, `->`, `&&`, ...).
    Operator = 39,

    // Delimiters: 80-95
    LeftParen = 80,
    RightParen = 81,
    LeftBracket = 82,
    RightBracket = 83,
    LeftBrace = 84,
    RightBrace = 85,
    Semicolon = 86,
    Comma = 87,
    At = 88,

    // Trivia: 112-119
    Whitespace = 112,
    LineComment = 113,
    BlockComment = 114,
    DocComment = 115,
    SpecialComment = 116,

    // Errors: 240-247
    InvalidByte = 240,
    UnterminatedString = 241,
    UnterminatedChar = 242,
    UnterminatedComment = 243,

    // Control: 255
    Eof = 255,
}

impl RawTag {
    /// Fixed source text for punctuation tags.
    pub fn lexeme(self) -> Option<&'static str> {
        Some(match self {
            RawTag::Assign => "=",
            RawTag::Less => "<",
            RawTag::Greater => ">",
            RawTag::Question => "?",
            RawTag::Colon => ":",
            RawTag::Dot => ".",
            RawTag::Ellipsis => "...",
            RawTag::LeftParen => "(",
            RawTag::RightParen => ")",
            RawTag::LeftBracket => "[",
            RawTag::RightBracket => "]",
            RawTag::LeftBrace => "{",
            RawTag::RightBrace => "}",
            RawTag::Semicolon => ";",
            RawTag::Comma => ",",
            RawTag::At => "@",
            _ => return None,
        })
    }

    /// Whitespace or any comment.
    #[inline]
    pub fn is_trivia(self) -> bool {
        (self as u8) >= 112 && (self as u8) < 120 || self == RawTag::UnterminatedComment
    }

    /// Any comment, terminated or not.
    #[inline]
    pub fn is_comment(self) -> bool {
        self.is_trivia() && self != RawTag::Whitespace
    }

    #[inline]
    pub fn is_error(self) -> bool {
        (self as u8) >= 240 && self != RawTag::Eof
    }
}

/// One scanned token: a tag and its byte length.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawToken {
    pub tag: RawTag,
    pub len: u32,
}

#[cfg(test)]
mod tests;
