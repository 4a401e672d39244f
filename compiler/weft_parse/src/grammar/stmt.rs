//! Statements inside method and block bodies.

use weft_lexer::{Keyword, RawTag};

use super::decl::param_item;
use super::{BodyContext, ParsedItem, Parser};
use crate::kind::NodeKind;
use crate::stack::ensure_sufficient_stack;

impl Parser<'_> {
    /// One statement. Nested statements recurse through here.
    pub(super) fn statement(&mut self) -> ParsedItem {
        ensure_sufficient_stack(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> ParsedItem {
        let tok = self.peek();
        let start = tok.start;
        match tok.keyword {
            Some(Keyword::If) => return self.if_statement(),
            Some(Keyword::Try) => return self.try_statement(),
            Some(Keyword::Switch | Keyword::Synchronized)
                if self.peek_nth(1).is(RawTag::LeftParen) =>
            {
                return self.guarded_block();
            }
            Some(Keyword::While) => return self.while_statement(),
            Some(Keyword::Do) => return self.do_statement(),
            Some(Keyword::For) => return self.for_statement(),
            Some(Keyword::Return | Keyword::Throw | Keyword::Assert) => {
                self.bump();
                let mut item = ParsedItem::new(NodeKind::Statement, start, start);
                item.children.extend(self.expression(false, false));
                return self.terminate(item);
            }
            Some(Keyword::Break | Keyword::Continue) => {
                self.bump();
                self.eat_ident();
                return self.terminate(ParsedItem::new(NodeKind::Statement, start, start));
            }
            Some(Keyword::Case) => {
                self.bump();
                let mut item = ParsedItem::new(NodeKind::Statement, start, start);
                item.children.extend(self.expression(false, true));
                return self.label_end(item);
            }
            Some(Keyword::Default) if self.peek_nth(1).is(RawTag::Colon) => {
                self.bump();
                return self.label_end(ParsedItem::new(NodeKind::Statement, start, start));
            }
            _ => {}
        }
        match tok.tag {
            RawTag::LeftBrace => return self.block(),
            RawTag::Semicolon => {
                self.bump();
                return ParsedItem::new(NodeKind::Statement, start, self.pos);
            }
            _ => {}
        }
        if self.local_type_def_ahead() {
            self.modifiers();
            return self.type_def(start);
        }
        if let Some(var) = self.local_variable(start, false) {
            return var;
        }
        let mut item = ParsedItem::new(NodeKind::Statement, start, start);
        item.children.extend(self.expression(false, false));
        self.terminate(item)
    }

    /// Close a statement with `;`.
    fn terminate(&mut self, mut item: ParsedItem) -> ParsedItem {
        item.complete = self.eat(RawTag::Semicolon);
        item.end = self.pos;
        item
    }

    /// Close a `case`/`default` label with `:`.
    fn label_end(&mut self, mut item: ParsedItem) -> ParsedItem {
        item.complete = self.eat(RawTag::Colon);
        item.end = self.pos;
        item
    }

    fn local_type_def_ahead(&mut self) -> bool {
        let mut n = 0;
        while self
            .peek_nth(n)
            .keyword
            .is_some_and(|k| matches!(k, Keyword::Final | Keyword::Abstract | Keyword::Static))
        {
            n += 1;
        }
        self.peek_nth(n).keyword.is_some_and(Keyword::starts_type_def)
    }

    /// `Type name ...` lies ahead. Speculative: the position is restored.
    fn local_variable_ahead(&mut self) -> bool {
        let saved = self.pos;
        self.modifiers();
        let ahead = self.parse_type().is_some()
            && self.peek().is_ident()
            && matches!(
                self.peek_nth(1).tag,
                RawTag::Assign
                    | RawTag::Semicolon
                    | RawTag::Comma
                    | RawTag::LeftBracket
                    | RawTag::Colon
                    | RawTag::RightParen
                    | RawTag::RightBrace
                    | RawTag::Eof
            );
        self.reset(saved);
        ahead
    }

    /// A local variable declaration, if one starts here. `in_header` marks
    /// `for` initializers and `try` resources, whose terminator belongs to
    /// the enclosing statement.
    fn local_variable(&mut self, start: usize, in_header: bool) -> Option<ParsedItem> {
        if !self.local_variable_ahead() {
            return None;
        }
        let mods = self.modifiers();
        let ty = self.parse_type()?;
        let name = self.eat_ident()?;
        Some(self.declarators(NodeKind::Variable, start, ty, name, mods.is_static, in_header))
    }

    /// `{ statements }`
    pub(super) fn block(&mut self) -> ParsedItem {
        let start = self.peek().start;
        let mut item = ParsedItem::new(NodeKind::Block, start, start);
        if self.at(RawTag::LeftBrace) {
            self.braced_body(&mut item, NodeKind::BlockBody, &BodyContext::default());
        } else {
            item.complete = false;
        }
        item
    }

    /// A block required by a `try`, `catch`, `finally`, `switch`, or
    /// `synchronized`.
    fn required_block(&mut self) -> Option<ParsedItem> {
        self.at(RawTag::LeftBrace).then(|| self.block())
    }

    /// `if (cond) stmt [else stmt]`
    fn if_statement(&mut self) -> ParsedItem {
        let start = self.bump().start;
        let mut item = ParsedItem::new(NodeKind::Selection, start, start);
        let (cond, closed) = self.paren_expression();
        item.children.extend(cond);
        if !closed {
            return self.unfinished(item);
        }
        let Some(then) = self.nested_statement() else {
            return self.unfinished(item);
        };
        item.complete = then.complete;
        item.children.push(then);
        if self.eat_kw(Keyword::Else) {
            let Some(other) = self.nested_statement() else {
                return self.unfinished(item);
            };
            item.complete &= other.complete;
            item.children.push(other);
        }
        item.end = self.pos;
        item
    }

    /// `try [(resources)] { } catch (T e) { } finally { }`
    fn try_statement(&mut self) -> ParsedItem {
        let start = self.bump().start;
        let mut item = ParsedItem::new(NodeKind::Selection, start, start);
        if self.eat(RawTag::LeftParen) {
            loop {
                let at = self.peek().start;
                match self.local_variable(at, true) {
                    Some(var) => item.children.push(var),
                    None => {
                        item.children.extend(self.expression(false, false));
                    }
                }
                if !self.eat(RawTag::Semicolon) {
                    break;
                }
            }
            if !self.eat(RawTag::RightParen) {
                return self.unfinished(item);
            }
        }
        let Some(body) = self.required_block() else {
            return self.unfinished(item);
        };
        let mut complete = body.complete;
        item.children.push(body);
        let mut handlers = 0;
        while self.at_kw(Keyword::Catch) {
            self.bump();
            handlers += 1;
            if !self.eat(RawTag::LeftParen) {
                return self.unfinished(item);
            }
            let param_start = self.peek().start;
            self.modifiers();
            let Some(mut ty) = self.parse_type() else {
                return self.unfinished(item);
            };
            while self.at(RawTag::Operator) && self.peek().text(self.src) == "|" {
                self.bump();
                if let Some(alt) = self.parse_type() {
                    ty.push('|');
                    ty.push_str(&alt);
                }
            }
            let Some(name) = self.eat_ident() else {
                return self.unfinished(item);
            };
            item.children.push(param_item(param_start, self.pos, ty, name));
            if !self.eat(RawTag::RightParen) {
                return self.unfinished(item);
            }
            let Some(handler) = self.required_block() else {
                return self.unfinished(item);
            };
            complete &= handler.complete;
            item.children.push(handler);
        }
        if self.eat_kw(Keyword::Finally) {
            handlers += 1;
            let Some(cleanup) = self.required_block() else {
                return self.unfinished(item);
            };
            complete &= cleanup.complete;
            item.children.push(cleanup);
        }
        item.complete = complete && handlers > 0;
        item.end = self.pos;
        item
    }

    /// `switch (e) { ... }` and `synchronized (e) { ... }`
    fn guarded_block(&mut self) -> ParsedItem {
        let start = self.bump().start;
        let mut item = ParsedItem::new(NodeKind::Selection, start, start);
        let (subject, closed) = self.paren_expression();
        item.children.extend(subject);
        if !closed {
            return self.unfinished(item);
        }
        let Some(body) = self.required_block() else {
            return self.unfinished(item);
        };
        item.complete = body.complete;
        item.children.push(body);
        item.end = self.pos;
        item
    }

    /// `while (cond) stmt`
    fn while_statement(&mut self) -> ParsedItem {
        let start = self.bump().start;
        let mut item = ParsedItem::new(NodeKind::Iteration, start, start);
        let (cond, closed) = self.paren_expression();
        item.children.extend(cond);
        if !closed {
            return self.unfinished(item);
        }
        let Some(body) = self.nested_statement() else {
            return self.unfinished(item);
        };
        item.complete = body.complete;
        item.children.push(body);
        item.end = self.pos;
        item
    }

    /// `do stmt while (cond);`
    fn do_statement(&mut self) -> ParsedItem {
        let start = self.bump().start;
        let mut item = ParsedItem::new(NodeKind::Iteration, start, start);
        let Some(body) = self.nested_statement() else {
            return self.unfinished(item);
        };
        let body_complete = body.complete;
        item.children.push(body);
        if !self.eat_kw(Keyword::While) {
            return self.unfinished(item);
        }
        let (cond, closed) = self.paren_expression();
        item.children.extend(cond);
        item.complete = closed && body_complete && self.eat(RawTag::Semicolon);
        item.end = self.pos;
        item
    }

    /// `for (init; cond; update) stmt` and `for (T x : e) stmt`
    fn for_statement(&mut self) -> ParsedItem {
        let start = self.bump().start;
        let mut item = ParsedItem::new(NodeKind::Iteration, start, start);
        if !self.eat(RawTag::LeftParen) {
            return self.unfinished(item);
        }
        let init_start = self.peek().start;
        match self.local_variable(init_start, true) {
            Some(var) => item.children.push(var),
            None => item.children.extend(self.expression(false, false)),
        }
        if self.eat(RawTag::Colon) {
            item.children.extend(self.expression(false, false));
        } else {
            if !self.eat(RawTag::Semicolon) {
                return self.unfinished(item);
            }
            item.children.extend(self.expression(false, false));
            if !self.eat(RawTag::Semicolon) {
                return self.unfinished(item);
            }
            item.children.extend(self.expression(false, false));
        }
        if !self.eat(RawTag::RightParen) {
            return self.unfinished(item);
        }
        let Some(body) = self.nested_statement() else {
            return self.unfinished(item);
        };
        item.complete = body.complete;
        item.children.push(body);
        item.end = self.pos;
        item
    }

    /// The body of a control statement. `None` at a stray `}` or end of
    /// input, which are left for the enclosing body.
    fn nested_statement(&mut self) -> Option<ParsedItem> {
        let tok = self.peek();
        if tok.is_eof() || tok.is(RawTag::RightBrace) {
            return None;
        }
        let item = self.statement();
        if item.end <= tok.start {
            return Some(self.junk());
        }
        Some(item)
    }

    fn unfinished(&mut self, mut item: ParsedItem) -> ParsedItem {
        item.complete = false;
        item.end = self.pos;
        item
    }
}
