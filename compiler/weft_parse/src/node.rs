//! Structural node storage.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use weft_tree::{NodeTree, TreeNodeId};

use crate::kind::{NodeDetail, NodeKind};

/// Arena index of a structural node.
///
/// Ids stay valid until the node is destroyed; a destroyed id may be
/// handed out again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(u32::try_from(index).is_ok());
        #[expect(clippy::cast_possible_truncation, reason = "arena sizes fit in u32")]
        NodeId(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node reports to its parent after an edit or a reparse.
///
/// Edits only ever produce [`NodeChange::Ok`] or [`NodeChange::Remove`];
/// a node's end moves only when its text is parsed again.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeChange {
    /// The node still describes its text and its size is current.
    Ok,
    /// The end moved forward. The parent drops siblings the node now
    /// overlaps and parses on from the new end.
    Grew { old_end: usize, new_end: usize },
    /// The end moved back. The parent parses the gap that opened.
    Shrunk { old_end: usize, new_end: usize },
    /// The node no longer describes its text. The parent drops it and
    /// parses again from where it started.
    Remove,
}

/// Declarations grouped by name. Overloads and shadowing share a name.
pub(crate) type DeclMap = FxHashMap<String, SmallVec<[NodeId; 2]>>;

/// One syntactic region of the document.
///
/// Position and size are not stored here: they live in the entry that
/// [`SyntaxNode::slot`] names inside the parent's child tree.
#[derive(Debug)]
pub struct SyntaxNode {
    pub(crate) kind: NodeKind,
    pub(crate) name: Option<String>,
    pub(crate) complete: bool,
    pub(crate) doc_comment: bool,
    pub(crate) detail: NodeDetail,
    pub(crate) parent: Option<NodeId>,
    pub(crate) slot: Option<TreeNodeId>,
    pub(crate) children: NodeTree<NodeId>,
    pub(crate) decls: DeclMap,
    pub(crate) live: bool,
}

impl SyntaxNode {
    pub(crate) fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        SyntaxNode {
            kind,
            name: None,
            complete: true,
            doc_comment: false,
            detail: NodeDetail::None,
            parent,
            slot: None,
            children: NodeTree::new(),
            decls: DeclMap::default(),
            live: true,
        }
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Declared name, for named kinds.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `false` when the node ran into the end of input or a syntax error
    /// before its closing token.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// A doc comment immediately precedes this declaration.
    #[inline]
    pub fn has_doc_comment(&self) -> bool {
        self.doc_comment
    }

    #[inline]
    pub fn detail(&self) -> &NodeDetail {
        &self.detail
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's children, positioned relative to this node's start.
    #[inline]
    pub fn children(&self) -> &NodeTree<NodeId> {
        &self.children
    }

    /// Declarations among this node's direct children named `name`, in
    /// insertion order.
    pub fn decls_named(&self, name: &str) -> &[NodeId] {
        self.decls.get(name).map_or(&[], |v| v.as_slice())
    }

    /// All names declared directly inside this node.
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.decls.keys().map(String::as_str)
    }

    /// Names this node contributes to its parent's declaration map.
    pub(crate) fn declared(&self) -> SmallVec<[String; 1]> {
        match self.kind {
            NodeKind::Field | NodeKind::Variable | NodeKind::Param => {
                self.detail.declarators().iter().cloned().collect()
            }
            NodeKind::TypeDef | NodeKind::MethodDef => self.name.iter().cloned().collect(),
            _ => SmallVec::new(),
        }
    }
}
