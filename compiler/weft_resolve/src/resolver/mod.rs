//! Scope walks for values and types.

use weft_lexer::Keyword;
use weft_parse::{ensure_sufficient_stack, NodeDetail, NodeId, NodeKind, SyntaxTree};

use crate::cache::ResolveCache;
use crate::entity::{Entity, Lookup, TypeRef};
use crate::external::{ExternalScope, NoExternal};

mod members;

pub(crate) use members::Receiver;

/// Supertype chains longer than this are treated as cyclic.
pub(crate) const MAX_SUPERTYPE_DEPTH: usize = 16;

/// Answers name questions against one document.
///
/// The tree must be up to date with `src`: run pending reparses first.
/// The cache is moved in and handed back by [`Resolver::into_cache`] so
/// that a caller can keep it across queries until the next edit.
pub struct Resolver<'a, E: ?Sized = NoExternal> {
    tree: &'a SyntaxTree,
    src: &'a str,
    external: &'a E,
    cache: ResolveCache,
}

impl<'a, E: ExternalScope + ?Sized> Resolver<'a, E> {
    pub fn new(tree: &'a SyntaxTree, src: &'a str, external: &'a E, cache: ResolveCache) -> Self {
        Resolver {
            tree,
            src,
            external,
            cache,
        }
    }

    pub fn into_cache(self) -> ResolveCache {
        self.cache
    }

    pub fn cache(&self) -> &ResolveCache {
        &self.cache
    }

    pub(crate) fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub(crate) fn src(&self) -> &'a str {
        self.src
    }

    pub(crate) fn external(&self) -> &'a E {
        self.external
    }

    /// What `name` denotes as a value at `pos`.
    ///
    /// Falls back to type resolution, so `Math` in `Math.abs(x)` is found
    /// as [`Entity::Type`].
    pub fn resolve_value(&mut self, name: &str, pos: usize) -> Lookup<Entity> {
        let scope = self.tree.innermost_at(pos);
        let found = match self.value_from(name, scope, pos) {
            Lookup::Unknown => self.resolve_type(name, pos).map(Entity::Type),
            found => found,
        };
        tracing::trace!(name, pos, ?found, "resolved value");
        found
    }

    fn value_from(&mut self, name: &str, from: NodeId, pos: usize) -> Lookup<Entity> {
        let tree = self.tree;
        for scope in tree.ancestors(from) {
            if tree.node(scope).kind().is_forward_visible() {
                return self.member_value(name, scope);
            }
            if let Some(decl) = closest_preceding(tree, scope, name, pos, is_value_decl) {
                return Lookup::Found(Entity::Variable(decl));
            }
        }
        Lookup::Unknown
    }

    fn member_value(&mut self, name: &str, scope: NodeId) -> Lookup<Entity> {
        if let Some(hit) = self.cache.cached_value(scope, name) {
            return hit;
        }
        let found = self.member_value_uncached(name, scope);
        self.cache.insert_value(scope, name, found.clone());
        found
    }

    fn member_value_uncached(&mut self, name: &str, scope: NodeId) -> Lookup<Entity> {
        let tree = self.tree;
        let node = tree.node(scope);
        let own = node
            .decls_named(name)
            .iter()
            .copied()
            .filter(|&d| is_value_decl(tree.node(d).kind()))
            .min_by_key(|&d| tree.start(d));
        if let Some(decl) = own {
            return Lookup::Found(Entity::Variable(decl));
        }
        // The compilation unit declares no values.
        let Some(owner) = node.parent() else {
            return Lookup::Unknown;
        };
        if let Some(decl) = self.inherited_field(owner, name, 0) {
            return Lookup::Found(Entity::Variable(decl));
        }
        let at = tree.start(owner);
        ensure_sufficient_stack(|| self.value_from(name, owner, at))
    }

    /// What type `name` denotes at `pos`.
    ///
    /// Accepts the type text stored on declarations: generic arguments
    /// are ignored, and `[]` or a trailing `...` become array levels.
    pub fn resolve_type(&mut self, name: &str, pos: usize) -> Lookup<TypeRef> {
        let (base, dims) = split_type_text(name);
        if base.is_empty() {
            return Lookup::Unknown;
        }
        if let Some(primitive) = primitive(base) {
            return Lookup::Found(TypeRef::Primitive(primitive).with_dims(dims));
        }
        let scope = self.tree.innermost_at(pos);
        let found = match base.split_once('.') {
            None => self.type_from(base, scope, pos),
            Some((head, rest)) => self.qualified_type(head, rest, scope, pos),
        };
        tracing::trace!(name, pos, ?found, "resolved type");
        found.map(|ty| ty.with_dims(dims))
    }

    /// Declared type of a field, local variable or parameter.
    pub fn type_of(&mut self, decl: NodeId) -> Lookup<TypeRef> {
        let tree = self.tree;
        let NodeDetail::Variable { type_name, .. } = tree.node(decl).detail() else {
            return Lookup::Unknown;
        };
        self.resolve_type(type_name, tree.start(decl))
    }

    fn type_from(&mut self, name: &str, from: NodeId, pos: usize) -> Lookup<TypeRef> {
        let tree = self.tree;
        for scope in tree.ancestors(from) {
            if tree.node(scope).kind().is_forward_visible() {
                return self.member_type(name, scope);
            }
            if let Some(found) = local_type(tree, scope, name, pos) {
                return Lookup::Found(found);
            }
        }
        Lookup::Unknown
    }

    fn member_type(&mut self, name: &str, scope: NodeId) -> Lookup<TypeRef> {
        if let Some(hit) = self.cache.cached_type(scope, name) {
            return hit;
        }
        let found = self.member_type_uncached(name, scope);
        self.cache.insert_type(scope, name, found.clone());
        found
    }

    fn member_type_uncached(&mut self, name: &str, scope: NodeId) -> Lookup<TypeRef> {
        let tree = self.tree;
        let node = tree.node(scope);
        let nested = node
            .decls_named(name)
            .iter()
            .copied()
            .filter(|&d| tree.node(d).kind() == NodeKind::TypeDef)
            .min_by_key(|&d| tree.start(d));
        if let Some(decl) = nested {
            return Lookup::Found(TypeRef::Declared(decl));
        }
        match node.parent() {
            Some(owner) => {
                let at = tree.start(owner);
                ensure_sufficient_stack(|| self.type_from(name, owner, at))
            }
            None => self.imported_type(name, scope),
        }
    }

    /// Single-type imports, then the package, on-demand imports and
    /// `java.lang`, then the default package.
    fn imported_type(&self, name: &str, unit: NodeId) -> Lookup<TypeRef> {
        let tree = self.tree;
        let mut package = None;
        let mut on_demand = Vec::new();
        for child in tree.children(unit) {
            let NodeDetail::Import {
                path,
                wildcard,
                is_static,
                is_package,
            } = tree.node(child.id).detail()
            else {
                continue;
            };
            if *is_package {
                package = Some(path.as_str());
            } else if *is_static {
                continue;
            } else if *wildcard {
                on_demand.push(path.as_str());
            } else if path.rsplit('.').next() == Some(name) {
                return Lookup::Found(TypeRef::External(path.clone()));
            }
        }
        let prefixes = package
            .into_iter()
            .chain(on_demand)
            .chain(std::iter::once("java.lang"));
        for prefix in prefixes {
            let qualified = format!("{prefix}.{name}");
            if self.external.has_type(&qualified) {
                return Lookup::Found(TypeRef::External(qualified));
            }
        }
        self.external_named(name)
    }

    /// `Outer.Inner`, `Imported.Nested` or a fully qualified name.
    fn qualified_type(&mut self, head: &str, rest: &str, scope: NodeId, pos: usize) -> Lookup<TypeRef> {
        match self.type_from(head, scope, pos) {
            Lookup::Found(TypeRef::Declared(outer)) => {
                let mut cur = outer;
                for segment in rest.split('.') {
                    match self.nested_type(cur, segment) {
                        Some(inner) => cur = inner,
                        None => return self.external_named(&format!("{head}.{rest}")),
                    }
                }
                Lookup::Found(TypeRef::Declared(cur))
            }
            Lookup::Found(TypeRef::External(outer)) => {
                let nested = format!("{outer}.{rest}");
                if self.external.has_type(&nested) {
                    Lookup::Found(TypeRef::External(nested))
                } else {
                    self.external_named(&format!("{head}.{rest}"))
                }
            }
            _ => self.external_named(&format!("{head}.{rest}")),
        }
    }

    pub(crate) fn external_named(&self, qualified: &str) -> Lookup<TypeRef> {
        if self.external.has_type(qualified) {
            Lookup::Found(TypeRef::External(qualified.to_owned()))
        } else {
            Lookup::Unknown
        }
    }

    /// A type declared directly in the body of `type_def`.
    pub(crate) fn nested_type(&self, type_def: NodeId, name: &str) -> Option<NodeId> {
        let tree = self.tree;
        let body = body_of(tree, type_def)?;
        tree.node(body)
            .decls_named(name)
            .iter()
            .copied()
            .filter(|&d| tree.node(d).kind() == NodeKind::TypeDef)
            .min_by_key(|&d| tree.start(d))
    }
}

/// The body node of a type definition.
pub(crate) fn body_of(tree: &SyntaxTree, type_def: NodeId) -> Option<NodeId> {
    tree.children(type_def)
        .map(|c| c.id)
        .find(|&c| tree.node(c).kind() == NodeKind::TypeBody)
}

#[inline]
pub(crate) fn is_value_decl(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::Field | NodeKind::Variable | NodeKind::Param)
}

/// The declaration of `name` in `scope` that starts closest before `pos`.
fn closest_preceding(
    tree: &SyntaxTree,
    scope: NodeId,
    name: &str,
    pos: usize,
    accept: fn(NodeKind) -> bool,
) -> Option<NodeId> {
    tree.node(scope)
        .decls_named(name)
        .iter()
        .copied()
        .filter(|&d| accept(tree.node(d).kind()))
        .map(|d| (tree.start(d), d))
        .filter(|&(start, _)| start <= pos)
        .max_by_key(|&(start, _)| start)
        .map(|(_, d)| d)
}

/// Type parameters and local classes of a positional scope.
fn local_type(tree: &SyntaxTree, scope: NodeId, name: &str, pos: usize) -> Option<TypeRef> {
    if tree.node(scope).detail().type_params().iter().any(|p| p == name) {
        return Some(TypeRef::Parameter {
            name: name.to_owned(),
            owner: scope,
        });
    }
    closest_preceding(tree, scope, name, pos, |kind| kind == NodeKind::TypeDef).map(TypeRef::Declared)
}

fn primitive(name: &str) -> Option<&'static str> {
    Keyword::from_ident(name)
        .filter(|kw| kw.is_primitive_type())
        .map(Keyword::as_str)
}

/// Split declared type text into its base name and array depth:
/// `List<String>[]` is `("List", 1)`, `int...` is `("int", 1)`. Of a
/// multi-catch `A|B` only `A` is kept.
fn split_type_text(text: &str) -> (&str, usize) {
    let text = text.split('|').next().unwrap_or_default().trim();
    let tail = text.rfind('>').map_or(text, |i| &text[i + 1..]);
    let dims = tail.matches("[]").count() + usize::from(tail.ends_with("..."));
    let base = &text[..text.find(['<', '[']).unwrap_or(text.len())];
    (base.trim_end_matches("..."), dims)
}
