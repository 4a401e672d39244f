//! Members of resolved types: field lookup through supertypes, member
//! access steps, and member name listings.

use std::collections::BTreeSet;

use weft_parse::{NodeDetail, NodeId, NodeKind, SyntaxNode, TypeFlavor};

use super::{body_of, is_value_decl, Resolver, MAX_SUPERTYPE_DEPTH};
use crate::entity::TypeRef;
use crate::external::{ExternalScope, MemberKind};

/// The left side of a member access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Receiver {
    /// A value of this type: every member is reachable.
    Instance(TypeRef),
    /// The type itself: only static members are reachable.
    Static(TypeRef),
}

impl Receiver {
    pub(crate) fn ty(&self) -> &TypeRef {
        match self {
            Receiver::Instance(ty) | Receiver::Static(ty) => ty,
        }
    }
}

impl<E: ExternalScope + ?Sized> Resolver<'_, E> {
    /// Supertypes of `type_def` that the document itself declares.
    pub(crate) fn document_supertypes(&mut self, type_def: NodeId) -> Vec<NodeId> {
        self.supertypes(type_def)
            .into_iter()
            .filter_map(|ty| match ty {
                TypeRef::Declared(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Every resolvable supertype of `type_def`, in declaration order.
    pub(crate) fn supertypes(&mut self, type_def: NodeId) -> Vec<TypeRef> {
        let tree = self.tree();
        let NodeDetail::Type { supertypes, .. } = tree.node(type_def).detail() else {
            return Vec::new();
        };
        let at = tree.start(type_def);
        supertypes
            .iter()
            .filter_map(|name| self.resolve_type(name, at).found())
            .collect()
    }

    /// A field declared by a document supertype of `type_def`.
    pub(crate) fn inherited_field(&mut self, type_def: NodeId, name: &str, depth: usize) -> Option<NodeId> {
        if depth >= MAX_SUPERTYPE_DEPTH {
            return None;
        }
        let tree = self.tree();
        for sup in self.document_supertypes(type_def) {
            let own = body_of(tree, sup).and_then(|body| {
                tree.node(body)
                    .decls_named(name)
                    .iter()
                    .copied()
                    .filter(|&d| is_value_decl(tree.node(d).kind()))
                    .min_by_key(|&d| tree.start(d))
            });
            if let Some(decl) = own.or_else(|| self.inherited_field(sup, name, depth + 1)) {
                return Some(decl);
            }
        }
        None
    }

    /// One step of a member access: `receiver.name`.
    pub(crate) fn select(&mut self, ty: &TypeRef, name: &str) -> Option<Receiver> {
        match ty {
            TypeRef::Declared(id) => self.select_declared(*id, name, 0),
            TypeRef::External(qualified) => {
                let member = self
                    .external()
                    .members(qualified)
                    .into_iter()
                    .find(|m| m.name == name)?;
                match member.kind {
                    MemberKind::Field => {
                        let type_name = member.type_name?;
                        let ty = match super::primitive(&type_name) {
                            Some(primitive) => TypeRef::Primitive(primitive),
                            None => self.external_named(&type_name).found()?,
                        };
                        Some(Receiver::Instance(ty))
                    }
                    MemberKind::Type => self
                        .external_named(&format!("{qualified}.{name}"))
                        .found()
                        .map(Receiver::Static),
                    MemberKind::Method => None,
                }
            }
            TypeRef::Array(_) if name == "length" => Some(Receiver::Instance(TypeRef::Primitive("int"))),
            _ => None,
        }
    }

    fn select_declared(&mut self, type_def: NodeId, name: &str, depth: usize) -> Option<Receiver> {
        let tree = self.tree();
        if let Some(body) = body_of(tree, type_def) {
            let decls = tree.node(body).decls_named(name);
            let first = |kind: NodeKind| {
                decls
                    .iter()
                    .copied()
                    .filter(|&d| tree.node(d).kind() == kind)
                    .min_by_key(|&d| tree.start(d))
            };
            // A field obscures a nested type of the same name.
            if let Some(field) = first(NodeKind::Field) {
                return self.type_of(field).found().map(Receiver::Instance);
            }
            if let Some(nested) = first(NodeKind::TypeDef) {
                return Some(Receiver::Static(TypeRef::Declared(nested)));
            }
        }
        if depth >= MAX_SUPERTYPE_DEPTH {
            return None;
        }
        for sup in self.document_supertypes(type_def) {
            if let Some(found) = self.select_declared(sup, name, depth + 1) {
                return Some(found);
            }
        }
        None
    }

    /// Names of the members of `ty`, sorted.
    pub(crate) fn member_names(&mut self, ty: &TypeRef, static_only: bool) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_members(ty, static_only, &mut out, 0);
        out
    }

    /// Members `type_def` inherits, excluding its own.
    pub(crate) fn inherited_names(&mut self, type_def: NodeId, static_only: bool, out: &mut BTreeSet<String>) {
        for sup in self.inherited_types(type_def) {
            self.collect_members(&sup, static_only, out, 1);
        }
    }

    fn collect_members(&mut self, ty: &TypeRef, static_only: bool, out: &mut BTreeSet<String>, depth: usize) {
        match ty {
            TypeRef::Declared(id) => {
                let tree = self.tree();
                if let Some(body) = body_of(tree, *id) {
                    let node = tree.node(body);
                    for name in node.declared_names() {
                        let visible = node
                            .decls_named(name)
                            .iter()
                            .any(|&d| is_visible_member(tree.node(d), static_only));
                        if visible {
                            out.insert(name.to_owned());
                        }
                    }
                }
                if depth < MAX_SUPERTYPE_DEPTH {
                    for sup in self.inherited_types(*id) {
                        self.collect_members(&sup, static_only, out, depth + 1);
                    }
                }
            }
            TypeRef::External(qualified) => {
                let members = self.external().members(qualified);
                out.extend(
                    members
                        .into_iter()
                        .filter(|m| !static_only || m.is_static)
                        .map(|m| m.name),
                );
            }
            TypeRef::Array(_) if !static_only => {
                out.insert("length".to_owned());
            }
            _ => {}
        }
    }

    /// Resolved supertypes; a class naming none inherits from
    /// `java.lang.Object` when that is known.
    fn inherited_types(&mut self, type_def: NodeId) -> Vec<TypeRef> {
        let tree = self.tree();
        let names_none = matches!(
            tree.node(type_def).detail(),
            NodeDetail::Type { supertypes, flavor, .. }
                if supertypes.is_empty() && *flavor != TypeFlavor::Interface
        );
        if names_none {
            return self.external_named("java.lang.Object").found().into_iter().collect();
        }
        self.supertypes(type_def)
    }
}

/// Members listed in completions. Constructors are not.
fn is_visible_member(node: &SyntaxNode, static_only: bool) -> bool {
    match node.kind() {
        NodeKind::TypeDef => true,
        NodeKind::MethodDef => {
            let constructor = matches!(node.detail(), NodeDetail::Method { return_type: None, .. });
            !constructor && (!static_only || node.detail().is_static())
        }
        NodeKind::Field => !static_only || node.detail().is_static(),
        _ => false,
    }
}
