//! Node kinds and their per-kind behavior table.
//!
//! Behavior that an inheritance hierarchy would spread over virtual methods
//! lives in one static table indexed by [`NodeKind`]. The partial parse of
//! a sequence kind is picked by kind in the grammar's piece dispatch.

use bitflags::bitflags;
use smallvec::SmallVec;

bitflags! {
    /// Stable per-kind properties.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct KindFlags: u8 {
        /// Draws a scope box (type, method, block, statement containers).
        const CONTAINER = 1 << 0;
        /// The brace-delimited interior of a container.
        const INNER = 1 << 1;
        /// The node consumes its own closing token.
        const MARKS_OWN_END = 1 << 2;
        /// Text inserted at either boundary belongs to the node.
        const GROWS_FORWARD = 1 << 3;
        /// A complete node of this kind is a safe place to resume parsing.
        const DELIMITING = 1 << 4;
        /// Children are produced one piece at a time by the reparse driver.
        const SEQUENCE = 1 << 5;
        /// Declarations are visible before their position.
        const FORWARD_VISIBLE = 1 << 6;
    }
}

/// Syntactic category of a structural node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    TypeDef,
    TypeBody,
    MethodDef,
    Param,
    Field,
    Variable,
    BlockBody,
    Block,
    Iteration,
    Selection,
    Statement,
    Expression,
    Comment,
    Import,
}

impl NodeKind {
    /// Classification flags for this kind.
    pub const fn flags(self) -> KindFlags {
        match self {
            NodeKind::CompilationUnit => KindFlags::SEQUENCE.union(KindFlags::FORWARD_VISIBLE),
            NodeKind::TypeBody => KindFlags::INNER
                .union(KindFlags::GROWS_FORWARD)
                .union(KindFlags::SEQUENCE)
                .union(KindFlags::FORWARD_VISIBLE),
            NodeKind::BlockBody => KindFlags::INNER
                .union(KindFlags::GROWS_FORWARD)
                .union(KindFlags::SEQUENCE),
            NodeKind::TypeDef | NodeKind::MethodDef | NodeKind::Block => KindFlags::CONTAINER
                .union(KindFlags::MARKS_OWN_END)
                .union(KindFlags::DELIMITING),
            // An `if` or `try` can still absorb a trailing `else`/`catch`, and
            // a loop may end in one, so neither is a resume point.
            NodeKind::Iteration | NodeKind::Selection => {
                KindFlags::CONTAINER.union(KindFlags::MARKS_OWN_END)
            }
            NodeKind::Field | NodeKind::Variable | NodeKind::Statement | NodeKind::Import => {
                KindFlags::MARKS_OWN_END.union(KindFlags::DELIMITING)
            }
            NodeKind::Param | NodeKind::Expression | NodeKind::Comment => KindFlags::empty(),
        }
    }

    #[inline]
    pub fn is_container(self) -> bool {
        self.flags().contains(KindFlags::CONTAINER)
    }

    #[inline]
    pub fn is_inner(self) -> bool {
        self.flags().contains(KindFlags::INNER)
    }

    #[inline]
    pub fn marks_own_end(self) -> bool {
        self.flags().contains(KindFlags::MARKS_OWN_END)
    }

    #[inline]
    pub fn grows_forward(self) -> bool {
        self.flags().contains(KindFlags::GROWS_FORWARD)
    }

    #[inline]
    pub fn is_delimiting(self) -> bool {
        self.flags().contains(KindFlags::DELIMITING)
    }

    #[inline]
    pub fn is_sequence(self) -> bool {
        self.flags().contains(KindFlags::SEQUENCE)
    }

    #[inline]
    pub fn is_forward_visible(self) -> bool {
        self.flags().contains(KindFlags::FORWARD_VISIBLE)
    }

    /// Kinds whose children go into the parent's declaration map.
    #[inline]
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::TypeDef
                | NodeKind::MethodDef
                | NodeKind::Field
                | NodeKind::Variable
                | NodeKind::Param
        )
    }
}

/// Which keyword introduced a type definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeFlavor {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// Comment flavor, mirrored by the highlight classes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommentStyle {
    /// `// ...` or `/* ... */`.
    Normal,
    /// `/** ... */`.
    Doc,
    /// `/*# ... */`.
    Special,
}

/// Kind-specific payload.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum NodeDetail {
    #[default]
    None,
    Type {
        flavor: TypeFlavor,
        type_params: SmallVec<[String; 2]>,
        supertypes: SmallVec<[String; 2]>,
    },
    Method {
        /// `None` for constructors.
        return_type: Option<String>,
        type_params: SmallVec<[String; 2]>,
        is_static: bool,
    },
    Variable {
        type_name: String,
        declarators: SmallVec<[String; 1]>,
        is_static: bool,
        /// The leading constant list of an enum body.
        enum_constants: bool,
    },
    Comment(CommentStyle),
    Import {
        path: String,
        wildcard: bool,
        is_static: bool,
        is_package: bool,
    },
}

impl NodeDetail {
    /// Declared names carried by a declaration node.
    pub fn declarators(&self) -> &[String] {
        match self {
            NodeDetail::Variable { declarators, .. } => declarators,
            _ => &[],
        }
    }

    /// Type parameters of a generic type or method.
    pub fn type_params(&self) -> &[String] {
        match self {
            NodeDetail::Type { type_params, .. } | NodeDetail::Method { type_params, .. } => {
                type_params
            }
            _ => &[],
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            NodeDetail::Method { is_static, .. }
            | NodeDetail::Variable { is_static, .. }
            | NodeDetail::Import { is_static, .. } => *is_static,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests;
