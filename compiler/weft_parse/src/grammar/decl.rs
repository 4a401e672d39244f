//! Declarations: type definitions, members, parameters, and type syntax.

use smallvec::SmallVec;
use weft_lexer::{Keyword, RawTag};

use super::{BodyContext, ParsedItem, Parser};
use crate::kind::{NodeDetail, NodeKind, TypeFlavor};

/// Modifiers and annotations preceding a declaration.
#[derive(Copy, Clone, Debug, Default)]
pub(super) struct Modifiers {
    pub is_static: bool,
}

impl Parser<'_> {
    /// Skip annotations and modifier keywords.
    pub(super) fn modifiers(&mut self) -> Modifiers {
        let mut mods = Modifiers::default();
        loop {
            let tok = self.peek();
            if tok.is(RawTag::At) && !self.peek_nth(1).is_keyword(Keyword::Interface) {
                self.annotation();
            } else if tok.keyword.is_some_and(Keyword::is_modifier) {
                // `synchronized (` opens a statement, not a modifier list.
                if tok.is_keyword(Keyword::Synchronized) && self.peek_nth(1).is(RawTag::LeftParen) {
                    return mods;
                }
                self.bump();
                mods.is_static |= tok.is_keyword(Keyword::Static);
            } else {
                return mods;
            }
        }
    }

    /// `@Name(.Name)* [( ... )]`
    fn annotation(&mut self) {
        self.bump();
        self.qualified_name();
        if self.at(RawTag::LeftParen) {
            self.skip_balanced();
        }
    }

    /// Skip a balanced bracketed run starting at the next token.
    pub(super) fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        loop {
            let tok = self.peek();
            match tok.tag {
                RawTag::Eof => return,
                RawTag::LeftParen | RawTag::LeftBracket | RawTag::LeftBrace => depth += 1,
                RawTag::RightParen | RawTag::RightBracket | RawTag::RightBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.bump();
            if depth == 0 {
                return;
            }
        }
    }

    fn qualified_name(&mut self) -> Option<String> {
        let mut name = self.eat_ident()?;
        while self.at(RawTag::Dot) && self.peek_nth(1).is_ident() {
            self.bump();
            name.push('.');
            if let Some(part) = self.eat_ident() {
                name.push_str(&part);
            }
        }
        Some(name)
    }

    /// A type: primitive or qualified name, optional type arguments, and
    /// array dimensions. Returns the type's text with whitespace removed.
    pub(super) fn parse_type(&mut self) -> Option<String> {
        let first = self.peek();
        let start = first.start;
        if first.keyword.is_some_and(Keyword::is_primitive_type) {
            self.bump();
        } else if first.is_ident() {
            self.bump();
            loop {
                if self.at(RawTag::Less) && !self.type_arguments() {
                    return None;
                }
                if self.at(RawTag::Dot) && self.peek_nth(1).is_ident() {
                    self.bump();
                    self.bump();
                } else {
                    break;
                }
            }
        } else {
            return None;
        }
        while self.at(RawTag::LeftBracket) && self.peek_nth(1).is(RawTag::RightBracket) {
            self.bump();
            self.bump();
        }
        if self.at(RawTag::Ellipsis) {
            self.bump();
        }
        Some(self.text(start, self.pos).split_whitespace().collect())
    }

    /// `< ... >` with nesting. Returns `false` if the brackets do not close
    /// over type-shaped tokens.
    fn type_arguments(&mut self) -> bool {
        let mut depth = 0usize;
        loop {
            let tok = self.peek();
            match tok.tag {
                RawTag::Less => depth += 1,
                RawTag::Greater => depth -= 1,
                RawTag::Ident | RawTag::Comma | RawTag::Dot | RawTag::Question => {}
                RawTag::LeftBracket | RawTag::RightBracket => {}
                RawTag::Operator if tok.text(self.src) == "&" => {}
                _ => return false,
            }
            self.bump();
            if depth == 0 {
                return true;
            }
        }
    }

    /// `<T, U extends Bound>` on a declaration. Returns the parameter names.
    fn type_parameters(&mut self) -> SmallVec<[String; 2]> {
        let mut names = SmallVec::new();
        if !self.eat(RawTag::Less) {
            return names;
        }
        let mut depth = 1usize;
        let mut expect_name = true;
        loop {
            let tok = self.peek();
            match tok.tag {
                RawTag::Eof | RawTag::LeftBrace | RawTag::LeftParen | RawTag::Semicolon => {
                    return names;
                }
                RawTag::Less => depth += 1,
                RawTag::Greater => depth -= 1,
                RawTag::Comma if depth == 1 => expect_name = true,
                _ if expect_name && tok.is_ident() && depth == 1 => {
                    names.push(tok.text(self.src).to_owned());
                    expect_name = false;
                }
                _ => {}
            }
            self.bump();
            if depth == 0 {
                return names;
            }
        }
    }

    /// `class`/`interface`/`enum`/`@interface` lies ahead, after modifiers.
    fn type_def_ahead(&mut self) -> bool {
        let tok = self.peek();
        tok.keyword.is_some_and(Keyword::starts_type_def)
            || (tok.is(RawTag::At) && self.peek_nth(1).is_keyword(Keyword::Interface))
    }

    /// A member of a type body, or a top-level declaration.
    pub(super) fn member(&mut self, ctx: &BodyContext) -> ParsedItem {
        let start = self.peek().start;
        if ctx.leading && ctx.flavor == Some(TypeFlavor::Enum) && self.enum_constants_ahead() {
            return self.enum_constants(start, ctx);
        }
        if self.at(RawTag::Semicolon) {
            self.bump();
            return ParsedItem::new(NodeKind::Statement, start, self.pos);
        }
        let mods = self.modifiers();
        if self.type_def_ahead() {
            return self.type_def(start);
        }
        if self.at(RawTag::LeftBrace) {
            // Initializer block, possibly `static`.
            let mut block = self.block();
            block.start = start;
            return block;
        }
        let type_params = if self.at(RawTag::Less) {
            self.type_parameters()
        } else {
            SmallVec::new()
        };
        if self.peek().is_ident() && self.peek_nth(1).is(RawTag::LeftParen) {
            let name = self.eat_ident();
            return self.method(start, mods, None, name, type_params);
        }
        let Some(ty) = self.parse_type() else {
            return ParsedItem::incomplete(NodeKind::Field, start, self.pos.max(start));
        };
        let Some(name) = self.eat_ident() else {
            return ParsedItem::incomplete(NodeKind::Field, start, self.pos);
        };
        if self.at(RawTag::LeftParen) {
            return self.method(start, mods, Some(ty), Some(name), type_params);
        }
        self.declarators(NodeKind::Field, start, ty, name, mods.is_static, false)
    }

    /// The enum constant list leads with `NAME` followed by `,` `;` `(` `{`
    /// or the closing brace.
    fn enum_constants_ahead(&mut self) -> bool {
        let mut n = 0;
        while self.peek_nth(n).is(RawTag::At) {
            // Annotated constants: `@Deprecated A`
            n += 2;
        }
        self.peek_nth(n).is_ident()
            && matches!(
                self.peek_nth(n + 1).tag,
                RawTag::Comma
                    | RawTag::Semicolon
                    | RawTag::LeftParen
                    | RawTag::LeftBrace
                    | RawTag::RightBrace
                    | RawTag::Eof
            )
    }

    /// `A, B(1), C { ... };`
    fn enum_constants(&mut self, start: usize, ctx: &BodyContext) -> ParsedItem {
        let mut declarators = SmallVec::new();
        let mut item = ParsedItem::new(NodeKind::Field, start, start);
        loop {
            while self.at(RawTag::At) {
                self.annotation();
            }
            let Some(name) = self.eat_ident() else { break };
            declarators.push(name);
            if self.at(RawTag::LeftParen) {
                let (arg, _) = self.paren_expression();
                item.children.extend(arg);
            }
            if self.at(RawTag::LeftBrace) {
                self.skip_balanced();
            }
            if !self.eat(RawTag::Comma) {
                break;
            }
        }
        // Without its `;` the list may still grow, so it cannot anchor a
        // resumed parse.
        item.complete = self.eat(RawTag::Semicolon);
        item.end = self.pos;
        item.detail = NodeDetail::Variable {
            type_name: ctx.owner.clone().unwrap_or_default(),
            declarators,
            is_static: true,
            enum_constants: true,
        };
        item
    }

    /// Declarators after the first name: `a = 1, b[], c = f();`
    pub(super) fn declarators(
        &mut self,
        kind: NodeKind,
        start: usize,
        type_name: String,
        first: String,
        is_static: bool,
        in_header: bool,
    ) -> ParsedItem {
        let mut item = ParsedItem::new(kind, start, start);
        let mut declarators: SmallVec<[String; 1]> = SmallVec::new();
        declarators.push(first);
        item.complete = false;
        loop {
            while self.at(RawTag::LeftBracket) && self.peek_nth(1).is(RawTag::RightBracket) {
                self.bump();
                self.bump();
            }
            if self.eat(RawTag::Assign) {
                item.children.extend(self.expression(true, in_header));
            }
            if !self.eat(RawTag::Comma) {
                break;
            }
            match self.eat_ident() {
                Some(name) => declarators.push(name),
                None => break,
            }
        }
        if in_header {
            // `for (int i = 0; ...)` and try resources: the terminator
            // belongs to the enclosing statement.
            item.complete = matches!(
                self.peek().tag,
                RawTag::Semicolon | RawTag::RightParen | RawTag::Colon
            );
        } else {
            item.complete = self.eat(RawTag::Semicolon);
        }
        item.end = self.pos;
        item.detail = NodeDetail::Variable {
            type_name,
            declarators,
            is_static,
            enum_constants: false,
        };
        item
    }

    /// `class Name<T> extends A implements B { body }`
    pub(super) fn type_def(&mut self, start: usize) -> ParsedItem {
        let flavor = if self.eat(RawTag::At) {
            self.bump();
            TypeFlavor::Annotation
        } else {
            match self.bump().keyword {
                Some(Keyword::Interface) => TypeFlavor::Interface,
                Some(Keyword::Enum) => TypeFlavor::Enum,
                _ => TypeFlavor::Class,
            }
        };
        let mut item = ParsedItem::new(NodeKind::TypeDef, start, self.pos);
        item.name = self.eat_ident();
        let type_params = self.type_parameters();
        let mut supertypes = SmallVec::new();
        loop {
            let tok = self.peek();
            if tok.is_keyword(Keyword::Extends) || tok.is_keyword(Keyword::Implements) {
                self.bump();
                while let Some(ty) = self.parse_type() {
                    supertypes.push(ty);
                    if !self.eat(RawTag::Comma) {
                        break;
                    }
                }
            } else if matches!(
                tok.tag,
                RawTag::LeftBrace | RawTag::RightBrace | RawTag::Semicolon | RawTag::Eof
            ) {
                break;
            } else {
                // Stray header token.
                self.bump();
                item.complete = false;
            }
        }
        item.detail = NodeDetail::Type {
            flavor,
            type_params,
            supertypes,
        };
        if self.at(RawTag::LeftBrace) {
            let ctx = BodyContext {
                flavor: Some(flavor),
                owner: item.name.clone(),
                leading: true,
            };
            item.complete = self.braced_body(&mut item, NodeKind::TypeBody, &ctx);
        } else {
            item.end = self.pos;
            item.complete = false;
        }
        item
    }

    /// Methods and constructors, from the opening parenthesis on.
    fn method(
        &mut self,
        start: usize,
        mods: Modifiers,
        return_type: Option<String>,
        name: Option<String>,
        type_params: SmallVec<[String; 2]>,
    ) -> ParsedItem {
        let mut item = ParsedItem::new(NodeKind::MethodDef, start, start);
        item.name = name;
        item.detail = NodeDetail::Method {
            return_type,
            type_params,
            is_static: mods.is_static,
        };
        self.parameters(&mut item.children);
        while self.at(RawTag::LeftBracket) && self.peek_nth(1).is(RawTag::RightBracket) {
            self.bump();
            self.bump();
        }
        if self.eat_kw(Keyword::Throws) {
            while self.parse_type().is_some() {
                if !self.eat(RawTag::Comma) {
                    break;
                }
            }
        }
        if self.eat_kw(Keyword::Default) {
            // Annotation element default value.
            let _ = self.expression(false, false);
        }
        if self.at(RawTag::LeftBrace) {
            item.complete =
                self.braced_body(&mut item, NodeKind::BlockBody, &BodyContext::default());
        } else {
            item.complete = self.eat(RawTag::Semicolon);
            item.end = self.pos;
        }
        item
    }

    /// `( [final] Type name, ... )`. A malformed list stops at the first
    /// token that does not fit.
    fn parameters(&mut self, out: &mut Vec<ParsedItem>) {
        if !self.eat(RawTag::LeftParen) {
            return;
        }
        loop {
            if self.eat(RawTag::RightParen) {
                return;
            }
            let start = self.peek().start;
            self.modifiers();
            let Some(ty) = self.parse_type() else {
                return;
            };
            let Some(name) = self.eat_ident() else {
                return;
            };
            while self.at(RawTag::LeftBracket) && self.peek_nth(1).is(RawTag::RightBracket) {
                self.bump();
                self.bump();
            }
            out.push(param_item(start, self.pos, ty, name));
            if !self.eat(RawTag::Comma) {
                self.eat(RawTag::RightParen);
                return;
            }
        }
    }
}

pub(super) fn param_item(start: usize, end: usize, type_name: String, name: String) -> ParsedItem {
    let mut item = ParsedItem::new(NodeKind::Param, start, end);
    item.detail = NodeDetail::Variable {
        type_name,
        declarators: smallvec::smallvec![name],
        is_static: false,
        enum_constants: false,
    };
    item
}
