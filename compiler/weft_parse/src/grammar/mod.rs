//! Piece-at-a-time grammar.
//!
//! The parser never builds nodes directly. It returns [`ParsedItem`] trees
//! which the reparse driver materializes into the arena. Sequence kinds
//! parse one child per call to their piece function, so a parse can stop
//! after any child and later resume from that child's end.

mod decl;
mod stmt;

use std::collections::VecDeque;

use weft_lexer::{Keyword, Lexer, RawTag, Token};

use crate::kind::{CommentStyle, NodeDetail, NodeKind, TypeFlavor};
use crate::stack::ensure_sufficient_stack;

/// A parsed subtree, positioned absolutely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedItem {
    pub kind: NodeKind,
    pub start: usize,
    pub end: usize,
    pub name: Option<String>,
    pub complete: bool,
    pub detail: NodeDetail,
    pub children: Vec<ParsedItem>,
}

impl ParsedItem {
    pub fn new(kind: NodeKind, start: usize, end: usize) -> Self {
        ParsedItem {
            kind,
            start,
            end,
            name: None,
            complete: true,
            detail: NodeDetail::None,
            children: Vec::new(),
        }
    }

    fn incomplete(kind: NodeKind, start: usize, end: usize) -> Self {
        ParsedItem {
            complete: false,
            ..ParsedItem::new(kind, start, end)
        }
    }
}

/// Result of one partial parse of a sequence body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Piece {
    Item(ParsedItem),
    /// A `}` at this position closes the body.
    Close(usize),
    /// Input ended.
    Eof,
}

/// What a body's piece function needs to know about its surroundings.
#[derive(Clone, Debug, Default)]
pub(crate) struct BodyContext {
    /// Flavor of the owning type, for type bodies.
    pub flavor: Option<TypeFlavor>,
    /// Name of the owning type.
    pub owner: Option<String>,
    /// No non-comment item precedes the current position in this body.
    pub leading: bool,
}

/// Token-level parser state over the whole document.
pub(crate) struct Parser<'s> {
    src: &'s str,
    /// End of the last consumed token.
    pos: usize,
    lookahead: VecDeque<Token>,
}

impl<'s> Parser<'s> {
    pub fn new(src: &'s str, pos: usize) -> Self {
        Parser {
            src,
            pos,
            lookahead: VecDeque::new(),
        }
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
        self.lookahead.clear();
    }

    fn text(&self, start: usize, end: usize) -> &'s str {
        self.src.get(start..end).unwrap_or("")
    }

    fn peek_nth(&mut self, n: usize) -> Token {
        while self.lookahead.len() <= n {
            let from = self.lookahead.back().map_or(self.pos, Token::end);
            let tok = Lexer::starting_at(self.src, from).next_significant();
            self.lookahead.push_back(tok);
        }
        self.lookahead[n]
    }

    #[inline]
    fn peek(&mut self) -> Token {
        self.peek_nth(0)
    }

    fn bump(&mut self) -> Token {
        let tok = self.peek();
        if !tok.is_eof() {
            self.lookahead.pop_front();
            self.pos = tok.end();
        }
        tok
    }

    fn at(&mut self, tag: RawTag) -> bool {
        self.peek().is(tag)
    }

    fn at_kw(&mut self, kw: Keyword) -> bool {
        self.peek().is_keyword(kw)
    }

    fn eat(&mut self, tag: RawTag) -> bool {
        let hit = self.at(tag);
        if hit {
            self.bump();
        }
        hit
    }

    fn eat_kw(&mut self, kw: Keyword) -> bool {
        let hit = self.at_kw(kw);
        if hit {
            self.bump();
        }
        hit
    }

    fn eat_ident(&mut self) -> Option<String> {
        let tok = self.peek();
        if tok.is_ident() {
            self.bump();
            Some(tok.text(self.src).to_owned())
        } else {
            None
        }
    }

    /// Next token that is not whitespace, comments included, starting at
    /// the current position. Used at sequence level, where comments become
    /// nodes.
    fn next_at_sequence_level(&self) -> Token {
        Lexer::starting_at(self.src, self.pos).next_non_whitespace()
    }

    /// Where the next piece will start: the first token after `pos` that
    /// is not whitespace, or the end of input.
    pub fn next_piece_start(&self) -> usize {
        self.next_at_sequence_level().start
    }

    /// Consume one token that nothing else accepts.
    fn junk(&mut self) -> ParsedItem {
        let tok = self.bump();
        ParsedItem::incomplete(NodeKind::Statement, tok.start, tok.end())
    }

    /// Run a piece parser with the shared sequence-level prologue: emit
    /// comments, report `}` and end of input, and guarantee progress.
    fn sequence_piece(
        &mut self,
        closes_on_brace: bool,
        item: impl FnOnce(&mut Self) -> ParsedItem,
    ) -> Piece {
        let tok = self.next_at_sequence_level();
        if tok.is_eof() {
            return Piece::Eof;
        }
        if tok.tag.is_comment() {
            self.reset(tok.end());
            return Piece::Item(comment_item(&tok));
        }
        if tok.is(RawTag::RightBrace) && closes_on_brace {
            return Piece::Close(tok.start);
        }
        self.reset(tok.start);
        let parsed = ensure_sufficient_stack(|| item(self));
        if parsed.end <= tok.start {
            self.reset(tok.start);
            return Piece::Item(self.junk());
        }
        if self.pos != parsed.end {
            self.reset(parsed.end);
        }
        Piece::Item(parsed)
    }

    /// Parse a whole body: pieces until `}` or end of input. Returns the
    /// children, the body's end, and whether a `}` closed it.
    pub fn body(
        &mut self,
        kind: NodeKind,
        ctx: &BodyContext,
    ) -> (Vec<ParsedItem>, usize, bool) {
        let mut ctx = ctx.clone();
        let mut items = Vec::new();
        loop {
            match self.piece(kind, &ctx) {
                Piece::Item(item) => {
                    if item.kind != NodeKind::Comment {
                        ctx.leading = false;
                    }
                    items.push(item);
                }
                Piece::Close(at) => {
                    self.reset(at);
                    return (items, at, true);
                }
                Piece::Eof => {
                    self.reset(self.src.len());
                    return (items, self.src.len(), false);
                }
            }
        }
    }

    /// Dispatch to the piece function of a sequence kind.
    pub fn piece(&mut self, kind: NodeKind, ctx: &BodyContext) -> Piece {
        match kind {
            NodeKind::CompilationUnit => self.sequence_piece(false, Self::unit_item),
            NodeKind::TypeBody => self.sequence_piece(true, |p| p.member(ctx)),
            NodeKind::BlockBody => self.sequence_piece(true, Self::statement),
            _ => Piece::Eof,
        }
    }

    /// `{ body }`, producing the owner's body child. The opening brace is
    /// the next token.
    fn braced_body(
        &mut self,
        owner: &mut ParsedItem,
        kind: NodeKind,
        ctx: &BodyContext,
    ) -> bool {
        let open = self.bump();
        self.reset(open.end());
        let (children, end, closed) = self.body(kind, ctx);
        let mut body = ParsedItem::new(kind, open.end(), end);
        body.children = children;
        owner.children.push(body);
        if closed {
            self.reset(end);
            self.bump();
            owner.end = end + 1;
        } else {
            owner.end = end;
            owner.complete = false;
        }
        closed
    }

    /// Scan a balanced run of tokens forming an expression.
    ///
    /// Stops before an unbalanced closer, a top-level `;`, a top-level `,`
    /// when `stop_at_comma`, or a top-level `:` when `stop_at_colon`.
    /// Returns the run's extent, or `None` if it is empty.
    fn expression(&mut self, stop_at_comma: bool, stop_at_colon: bool) -> Option<ParsedItem> {
        let mut open: Vec<RawTag> = Vec::new();
        let start = self.peek().start;
        let mut end = None;
        loop {
            let tok = self.peek();
            match tok.tag {
                RawTag::Eof => break,
                RawTag::LeftParen | RawTag::LeftBracket | RawTag::LeftBrace => open.push(tok.tag),
                RawTag::RightParen | RawTag::RightBracket | RawTag::RightBrace => {
                    if open.pop().is_none() {
                        break;
                    }
                }
                RawTag::Semicolon => {
                    if open.last() != Some(&RawTag::LeftBrace) {
                        break;
                    }
                }
                RawTag::Comma if stop_at_comma && open.is_empty() => break,
                RawTag::Colon if stop_at_colon && open.is_empty() => break,
                _ => {}
            }
            self.bump();
            end = Some(tok.end());
        }
        end.map(|end| ParsedItem::new(NodeKind::Expression, start, end))
    }

    /// `( expression )`. Returns the expression child, if any, and whether
    /// the closing parenthesis was found.
    fn paren_expression(&mut self) -> (Option<ParsedItem>, bool) {
        if !self.eat(RawTag::LeftParen) {
            return (None, false);
        }
        let expr = self.expression(false, false);
        (expr, self.eat(RawTag::RightParen))
    }

    /// Top-level item of a compilation unit.
    fn unit_item(&mut self) -> ParsedItem {
        let tok = self.peek();
        if tok.is_keyword(Keyword::Package) || tok.is_keyword(Keyword::Import) {
            return self.directive();
        }
        self.member(&BodyContext::default())
    }

    /// `package a.b;` or `import [static] a.b.*;`.
    fn directive(&mut self) -> ParsedItem {
        let head = self.bump();
        let is_package = head.is_keyword(Keyword::Package);
        let is_static = !is_package && self.eat_kw(Keyword::Static);
        let mut path = String::new();
        let mut wildcard = false;
        loop {
            let tok = self.peek();
            if tok.is_ident() {
                self.bump();
                path.push_str(tok.text(self.src));
            } else if tok.tag == RawTag::Operator && tok.text(self.src) == "*" {
                self.bump();
                wildcard = true;
                break;
            } else {
                break;
            }
            if !self.at(RawTag::Dot) {
                break;
            }
            self.bump();
            path.push('.');
        }
        if wildcard && path.ends_with('.') {
            path.pop();
        }
        let complete = self.eat(RawTag::Semicolon);
        let mut item = ParsedItem::new(NodeKind::Import, head.start, self.pos);
        item.complete = complete && !path.is_empty();
        if !wildcard {
            item.name = path.rsplit('.').next().filter(|s| !s.is_empty()).map(str::to_owned);
        }
        item.detail = NodeDetail::Import {
            path,
            wildcard,
            is_static,
            is_package,
        };
        item
    }
}

fn comment_item(tok: &Token) -> ParsedItem {
    let style = match tok.tag {
        RawTag::DocComment => CommentStyle::Doc,
        RawTag::SpecialComment => CommentStyle::Special,
        _ => CommentStyle::Normal,
    };
    let mut item = ParsedItem::new(NodeKind::Comment, tok.start, tok.end());
    item.complete = tok.tag != RawTag::UnterminatedComment;
    item.detail = NodeDetail::Comment(style);
    item
}

/// Parse a complete document from scratch, without the node arena.
pub(crate) fn parse_document(src: &str) -> Vec<ParsedItem> {
    let mut parser = Parser::new(src, 0);
    let (items, _, _) = parser.body(NodeKind::CompilationUnit, &BodyContext::default());
    items
}
