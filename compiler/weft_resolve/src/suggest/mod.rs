//! Completion queries.

use std::collections::BTreeSet;

use smallvec::SmallVec;
use weft_lexer::{RawTag, Token};
use weft_parse::{NodeDetail, NodeId, NodeKind};

use crate::entity::{Entity, Lookup, TypeRef};
use crate::external::ExternalScope;
use crate::resolver::{Receiver, Resolver};

/// What may be typed at a position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeSuggestions {
    /// Candidate names, sorted, already narrowed to those starting with
    /// `prefix`.
    pub names: Vec<String>,
    /// The part of an identifier typed before the position.
    pub prefix: String,
    /// The receiver type of a member access, else the enclosing type.
    pub type_context: Option<TypeRef>,
    /// Only static members are reachable.
    pub static_only: bool,
}

/// The shape of the code just before the position.
enum Access<'s> {
    /// No member access: any visible name fits.
    Bare,
    /// `a.b.` with the segments in order.
    Member(SmallVec<[&'s str; 4]>),
    /// A member access on something other than a name chain, e.g. `f().`
    Opaque,
}

impl<E: ExternalScope + ?Sized> Resolver<'_, E> {
    /// Completion candidates at `pos`.
    ///
    /// `None` inside comments and literals, outside any type body, and
    /// after a member access whose receiver cannot be resolved.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn expression_type(&mut self, pos: usize) -> Option<CodeSuggestions> {
        let src = self.src();
        let tree = self.tree();
        let pos = pos.min(src.len());
        let tokens = self.tokens_before(pos)?;
        let inner = tree.innermost_at(pos);
        let body = tree
            .ancestors(inner)
            .find(|&id| tree.node(id).kind() == NodeKind::TypeBody)?;
        let owner = tree.node(body).parent()?;

        let (prefix, access) = split_access(src, &tokens, pos);
        let (names, type_context, static_only) = match access {
            Access::Opaque => return None,
            Access::Member(chain) => {
                let receiver = self.receiver(&chain, owner, pos)?;
                let static_only = matches!(receiver, Receiver::Static(_));
                let ty = receiver.ty().clone();
                (self.member_names(&ty, static_only), ty, static_only)
            }
            Access::Bare => {
                let static_only = self.static_context(inner, body);
                let names = self.visible_names(inner, pos, static_only);
                (names, TypeRef::Declared(owner), static_only)
            }
        };
        let names: Vec<String> = names
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect();
        tracing::debug!(count = names.len(), prefix, static_only, "suggestions");
        Some(CodeSuggestions {
            names,
            prefix: prefix.to_owned(),
            type_context: Some(type_context),
            static_only,
        })
    }

    /// Significant tokens from the closest known boundary up to `pos`, or
    /// `None` if `pos` is inside a comment or a literal.
    fn tokens_before(&self, pos: usize) -> Option<Vec<Token>> {
        // Anchor strictly before `pos` so a token ending at `pos` is seen.
        let mut lexer = self.tree().lexer_at(self.src(), pos.saturating_sub(1));
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            if tok.is_eof() || tok.start >= pos {
                return Some(out);
            }
            // An unclosed comment or literal also owns the position at its end.
            let open = matches!(
                tok.tag,
                RawTag::LineComment
                    | RawTag::UnterminatedComment
                    | RawTag::UnterminatedString
                    | RawTag::UnterminatedChar
            );
            let textual = tok.tag.is_comment()
                || matches!(
                    tok.tag,
                    RawTag::String | RawTag::Char | RawTag::UnterminatedString | RawTag::UnterminatedChar
                );
            if textual && (tok.end() > pos || (open && tok.end() == pos)) {
                return None;
            }
            if !tok.tag.is_trivia() {
                out.push(tok);
            }
        }
    }

    fn receiver(&mut self, chain: &[&str], owner: NodeId, pos: usize) -> Option<Receiver> {
        let (&first, rest) = chain.split_first()?;
        let head = match first {
            "this" => Receiver::Instance(TypeRef::Declared(owner)),
            "super" => Receiver::Instance(self.superclass(owner)?),
            name => match self.resolve_value(name, pos) {
                Lookup::Found(Entity::Variable(decl)) => Receiver::Instance(self.type_of(decl).found()?),
                Lookup::Found(Entity::Type(ty)) => Receiver::Static(ty),
                Lookup::Unknown => return self.package_access(chain),
            },
        };
        self.select_all(head, rest)
    }

    /// `java.util.List.` style chains: the longest prefix naming an
    /// external type.
    fn package_access(&mut self, chain: &[&str]) -> Option<Receiver> {
        let (len, ty) = (1..=chain.len()).rev().find_map(|len| {
            let qualified = chain[..len].join(".");
            self.external_named(&qualified).found().map(|ty| (len, ty))
        })?;
        self.select_all(Receiver::Static(ty), &chain[len..])
    }

    fn select_all(&mut self, mut receiver: Receiver, segments: &[&str]) -> Option<Receiver> {
        for segment in segments {
            let ty = receiver.ty().clone();
            receiver = self.select(&ty, segment)?;
        }
        Some(receiver)
    }

    fn superclass(&mut self, type_def: NodeId) -> Option<TypeRef> {
        self.supertypes(type_def)
            .into_iter()
            .next()
            .or_else(|| self.external_named("java.lang.Object").found())
    }

    /// Inside a static method, a static field initializer or a `static`
    /// initializer block of the innermost type.
    fn static_context(&self, inner: NodeId, body: NodeId) -> bool {
        let tree = self.tree();
        let src = self.src();
        tree.ancestors(inner)
            .take_while(|&id| id != body)
            .any(|id| {
                let node = tree.node(id);
                match node.kind() {
                    NodeKind::MethodDef | NodeKind::Field => node.detail().is_static(),
                    NodeKind::Block => {
                        node.parent() == Some(body)
                            && src
                                .get(tree.start(id)..)
                                .is_some_and(|rest| rest.starts_with("static"))
                    }
                    _ => false,
                }
            })
    }

    /// Every name in scope at `pos`, innermost scopes first.
    fn visible_names(&mut self, inner: NodeId, pos: usize, static_only: bool) -> BTreeSet<String> {
        let tree = self.tree();
        let mut out = BTreeSet::new();
        let mut at = pos;
        let mut innermost_type = true;
        for scope in tree.ancestors(inner) {
            let node = tree.node(scope);
            out.extend(node.detail().type_params().iter().cloned());
            match node.kind() {
                NodeKind::TypeBody => {
                    let restrict = static_only && innermost_type;
                    out.extend(
                        node.declared_names()
                            .filter(|name| {
                                node.decls_named(name).iter().any(|&d| {
                                    !restrict
                                        || tree.node(d).kind() == NodeKind::TypeDef
                                        || tree.node(d).detail().is_static()
                                })
                            })
                            .map(str::to_owned),
                    );
                    if innermost_type {
                        if let Some(owner) = node.parent() {
                            self.inherited_names(owner, restrict, &mut out);
                        }
                    }
                    innermost_type = false;
                }
                NodeKind::CompilationUnit => {
                    out.extend(node.declared_names().map(str::to_owned));
                    for child in tree.children(scope) {
                        if let NodeDetail::Import {
                            path,
                            wildcard: false,
                            is_static: false,
                            is_package: false,
                        } = tree.node(child.id).detail()
                        {
                            out.extend(path.rsplit('.').next().map(str::to_owned));
                        }
                    }
                }
                _ => out.extend(
                    node.declared_names()
                        .filter(|name| node.decls_named(name).iter().any(|&d| tree.start(d) <= at))
                        .map(str::to_owned),
                ),
            }
            if node.kind() == NodeKind::TypeDef {
                at = tree.start(scope);
            }
        }
        out
    }
}

/// Split the tokens before `pos` into the identifier being typed and the
/// member access it belongs to.
fn split_access<'s>(src: &'s str, tokens: &[Token], pos: usize) -> (&'s str, Access<'s>) {
    let mut rest = tokens;
    let mut prefix = "";
    if let Some((last, init)) = rest.split_last() {
        if last.is(RawTag::Ident) && last.end() >= pos {
            prefix = src.get(last.start..pos).unwrap_or_default();
            rest = init;
        }
    }
    match rest.split_last() {
        Some((dot, init)) if dot.is(RawTag::Dot) => rest = init,
        _ => return (prefix, Access::Bare),
    }
    let mut segments = SmallVec::new();
    loop {
        match rest.split_last() {
            Some((segment, init)) if segment.is(RawTag::Ident) => {
                segments.push(segment.text(src));
                rest = init;
            }
            _ => return (prefix, Access::Opaque),
        }
        match rest.split_last() {
            Some((dot, init)) if dot.is(RawTag::Dot) => rest = init,
            _ => break,
        }
    }
    segments.reverse();
    (prefix, Access::Member(segments))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
