//! Scanner for the Java-like source language edited by weft.
//!
//! The crate has two layers:
//!
//! - [`RawScanner`] produces `(RawTag, len)` pairs over a byte window of the
//!   document, encoding errors (unterminated literals, stray bytes) as tags.
//! - [`Lexer`] attaches absolute positions and resolves identifiers into
//!   [`Keyword`]s, producing [`Token`]s for the parser.
//!
//! [`HighlightTag`] and [`classify`] map tokens onto the closed set of
//! highlight classes handed to the editor's painter.
//!
//! Token boundaries always fall on UTF-8 character boundaries: non-ASCII
//! bytes are scanned as identifier characters.

mod cursor;
mod highlight;
mod keyword;
mod lexer;
mod raw_scanner;
mod tag;

pub use cursor::Cursor;
pub use highlight::{classify, HighlightTag};
pub use keyword::Keyword;
pub use lexer::{Lexer, Token};
pub use raw_scanner::RawScanner;
pub use tag::{RawTag, RawToken};
