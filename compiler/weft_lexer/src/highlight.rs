//! Highlight classification.
//!
//! Maps lexed tokens onto the closed set of classes the editor paints.

use crate::keyword::Keyword;
use crate::lexer::Token;
use crate::tag::RawTag;

/// Highlight class of a token run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HighlightTag {
    Default,
    /// Modifiers and control-flow words.
    KeywordPrimary,
    /// Declaration words: `class`, `import`, `extends`, ...
    KeywordSecondary,
    /// `this`, `super`, `null`, `true`, `false`.
    KeywordLiteral,
    StringLiteral,
    CharLiteral,
    PrimitiveType,
    Operator,
    CommentNormal,
    CommentSpecial,
    CommentDoc,
    /// Terminates a token sequence; always zero length.
    End,
}

/// Classify one token.
pub fn classify(token: &Token) -> HighlightTag {
    match token.tag {
        RawTag::String | RawTag::UnterminatedString => HighlightTag::StringLiteral,
        RawTag::Char | RawTag::UnterminatedChar => HighlightTag::CharLiteral,
        RawTag::LineComment | RawTag::BlockComment | RawTag::UnterminatedComment => {
            HighlightTag::CommentNormal
        }
        RawTag::DocComment => HighlightTag::CommentDoc,
        RawTag::SpecialComment => HighlightTag::CommentSpecial,
        RawTag::Ident => token.keyword.map_or(HighlightTag::Default, keyword_class),
        _ => HighlightTag::Default,
    }
}

fn keyword_class(kw: Keyword) -> HighlightTag {
    if kw.is_primitive_type() {
        return HighlightTag::PrimitiveType;
    }
    if kw.is_modifier() {
        return HighlightTag::KeywordPrimary;
    }
    match kw {
        Keyword::Assert
        | Keyword::For
        | Keyword::Switch
        | Keyword::While
        | Keyword::Do
        | Keyword::Try
        | Keyword::Catch
        | Keyword::Throw
        | Keyword::Throws
        | Keyword::Finally
        | Keyword::Return
        | Keyword::Case
        | Keyword::Default
        | Keyword::Break
        | Keyword::Continue
        | Keyword::If
        | Keyword::Else
        | Keyword::New => HighlightTag::KeywordPrimary,
        Keyword::Class
        | Keyword::Package
        | Keyword::Import
        | Keyword::Extends
        | Keyword::Interface
        | Keyword::Enum
        | Keyword::Implements => HighlightTag::KeywordSecondary,
        Keyword::This | Keyword::Null | Keyword::Super | Keyword::True | Keyword::False => {
            HighlightTag::KeywordLiteral
        }
        Keyword::Instanceof => HighlightTag::Operator,
        _ => HighlightTag::Default,
    }
}
