//! The structural node arena.
//!
//! Every node lives in one `Vec`, addressed by [`NodeId`]. A node's span is
//! stored in its parent's [`NodeTree`] (the root's in a one-entry tree of
//! its own), so a size change anywhere costs O(log n) per ancestor level
//! rather than a rewrite of every later position.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use weft_tree::{NodeTree, TreeInvariantError, TreeNodeId};

use crate::grammar::{parse_document, ParsedItem};
use crate::kind::{CommentStyle, NodeDetail, NodeKind};
use crate::node::{NodeId, SyntaxNode};
use crate::reparse::{ReparseQueue, ReparseStats};
use crate::stack::ensure_sufficient_stack;

/// A half-open absolute byte range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A child together with its absolute span.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChildSpan {
    pub id: NodeId,
    pub start: usize,
    pub end: usize,
}

/// Structural change notification.
///
/// Ids in `Removed` events are dead and may already be reused by a later
/// `Added` event in the same batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StructureEvent {
    Added { node: NodeId, kind: NodeKind },
    Removed { node: NodeId, kind: NodeKind },
    Resized { node: NodeId, old_end: usize, new_end: usize },
}

/// Flattened view of one node, used for comparisons and debug output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSummary {
    pub depth: usize,
    pub kind: NodeKind,
    pub start: usize,
    pub end: usize,
    pub name: Option<String>,
    pub complete: bool,
    pub doc_comment: bool,
    pub detail: NodeDetail,
}

/// Structural inconsistencies found by [`SyntaxTree::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("child tree of {node:?} is malformed: {source}")]
    Tree {
        node: NodeId,
        source: TreeInvariantError,
    },
    #[error("{child:?} at {start}..{end} lies outside its parent {node:?} of size {size}")]
    ChildOutsideParent {
        node: NodeId,
        child: NodeId,
        start: usize,
        end: usize,
        size: usize,
    },
    #[error("{child:?} names {parent:?} as parent but is not stored there")]
    Detached { parent: NodeId, child: NodeId },
    #[error("declaration map of {node:?} disagrees with its children for `{name}`")]
    Declarations { node: NodeId, name: String },
}

/// The incrementally maintained structure of one document.
#[derive(Debug)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    free: Vec<NodeId>,
    /// Holds the root's single entry.
    top: NodeTree<NodeId>,
    root: NodeId,
    pub(crate) pending: ReparseQueue,
    pub(crate) stats: ReparseStats,
    events: Vec<StructureEvent>,
    record_events: bool,
}

impl SyntaxTree {
    /// A tree for an empty document.
    pub fn new() -> Self {
        let mut tree = SyntaxTree {
            nodes: Vec::new(),
            free: Vec::new(),
            top: NodeTree::new(),
            root: NodeId::from_index(0),
            pending: ReparseQueue::default(),
            stats: ReparseStats::default(),
            events: Vec::new(),
            record_events: false,
        };
        let root = tree.alloc(NodeKind::CompilationUnit, None);
        let slot = tree.top.insert(root, 0, 0);
        tree.node_mut(root).slot = Some(slot);
        tree.root = root;
        tree
    }

    /// Parse `src` from scratch.
    pub fn parse(src: &str) -> Self {
        let mut tree = SyntaxTree::new();
        let root = tree.root;
        tree.set_size(root, src.len());
        for item in parse_document(src) {
            tree.materialize(root, 0, item);
        }
        tree
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node behind `id`. Dead ids return a dead placeholder; check
    /// [`SyntaxTree::is_live`] when holding ids across edits.
    #[inline]
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SyntaxNode {
        &mut self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index()).filter(|n| n.live)
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Counters accumulated by the reparse driver.
    pub fn stats(&self) -> &ReparseStats {
        &self.stats
    }

    /// Start or stop recording [`StructureEvent`]s.
    pub fn set_event_recording(&mut self, on: bool) {
        self.record_events = on;
        if !on {
            self.events.clear();
        }
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<StructureEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: StructureEvent) {
        if self.record_events {
            self.events.push(event);
        }
    }

    // ─── Geometry ─────────────────────────────────────────────────

    /// The tree that stores `id`'s span.
    fn host(&self, id: NodeId) -> &NodeTree<NodeId> {
        match self.node(id).parent {
            Some(parent) => &self.node(parent).children,
            None => &self.top,
        }
    }

    fn host_mut(&mut self, id: NodeId) -> &mut NodeTree<NodeId> {
        match self.nodes[id.index()].parent {
            Some(parent) => &mut self.nodes[parent.index()].children,
            None => &mut self.top,
        }
    }

    /// Absolute start of an attached node.
    pub fn start(&self, id: NodeId) -> usize {
        let mut pos = 0;
        let mut cur = id;
        loop {
            let node = self.node(cur);
            let Some(slot) = node.slot else {
                return pos;
            };
            pos += self.host(cur).position(slot);
            match node.parent {
                Some(parent) => cur = parent,
                None => return pos,
            }
        }
    }

    pub fn size(&self, id: NodeId) -> usize {
        self.node(id).slot.map_or(0, |slot| self.host(id).size(slot))
    }

    pub fn end(&self, id: NodeId) -> usize {
        self.start(id) + self.size(id)
    }

    pub fn span(&self, id: NodeId) -> Span {
        let start = self.start(id);
        Span {
            start,
            end: start + self.size(id),
        }
    }

    /// Grow or shrink a node, moving its later siblings.
    pub(crate) fn resize_by(&mut self, id: NodeId, delta: isize) {
        if let Some(slot) = self.node(id).slot {
            let size = self.host(id).size(slot);
            self.host_mut(id)
                .resize(slot, size.saturating_add_signed(delta));
        }
    }

    /// Change a node's size, leaving its later siblings in place.
    pub(crate) fn set_size(&mut self, id: NodeId, size: usize) {
        if let Some(slot) = self.node(id).slot {
            self.host_mut(id).set_size(slot, size);
        }
    }

    // ─── Navigation ───────────────────────────────────────────────

    /// Children of `id` in document order, with absolute spans.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = ChildSpan> + '_ {
        let base = self.start(id);
        self.node(id).children.iter().map(move |(at, &child)| ChildSpan {
            id: child,
            start: base + at.position,
            end: base + at.end(),
        })
    }

    /// The node held by `slot` of `parent`'s child tree. A slot that no
    /// longer holds anything means the tree is corrupt.
    pub(crate) fn payload(&self, parent: NodeId, slot: TreeNodeId) -> Option<NodeId> {
        let child = self.node(parent).children.get(slot).copied();
        debug_assert!(child.is_some(), "empty slot {slot:?} under {parent:?}");
        child
    }

    /// The sibling after `id` in its parent.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let slot = self.node(id).slot?;
        let host = self.host(id);
        host.next(slot).and_then(|at| host.get(at.id).copied())
    }

    /// The sibling before `id` in its parent.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let slot = self.node(id).slot?;
        let host = self.host(id);
        host.prev(slot).and_then(|at| host.get(at.id).copied())
    }

    /// `id` and its ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&cur| self.node(cur).parent)
    }

    /// The innermost node whose span holds `pos`.
    ///
    /// A position at a node's end belongs to it, one at its start to its
    /// parent, except that body nodes also own their start so that an empty
    /// `{}` body can be found.
    pub fn innermost_at(&self, pos: usize) -> NodeId {
        let mut cur = self.root;
        let mut base = 0;
        loop {
            let tree = &self.node(cur).children;
            let rel = pos.saturating_sub(base);
            let mut found = None;
            let mut at = tree.find_node_at_or_after(rel);
            while let Some(loc) = at {
                if loc.position > rel {
                    break;
                }
                let Some(child) = self.payload(cur, loc.id) else {
                    break;
                };
                let inner = self.node(child).kind.is_inner();
                if loc.position < rel || (inner && loc.position == rel) {
                    found = Some((child, loc.position));
                    break;
                }
                at = tree.next_sibling(loc);
            }
            match found {
                Some((child, offset)) => {
                    base += offset;
                    cur = child;
                }
                None => return cur,
            }
        }
    }

    // ─── Structure ────────────────────────────────────────────────

    fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let node = SyntaxNode::new(kind, parent);
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId::from_index(self.nodes.len() - 1)
            }
        }
    }

    /// Store `child` in `parent` at absolute `start`.
    pub(crate) fn attach(&mut self, parent: NodeId, parent_start: usize, child: NodeId, start: usize, size: usize) {
        let slot = self
            .node_mut(parent)
            .children
            .insert(child, start - parent_start, size);
        let node = self.node_mut(child);
        node.slot = Some(slot);
        node.parent = Some(parent);
        for name in self.node(child).declared() {
            self.node_mut(parent).decls.entry(name).or_default().push(child);
        }
        self.refresh_doc_comment(child);
    }

    /// Take `id` out of its parent's tree and declaration map. The node
    /// keeps its subtree and its parent link.
    pub(crate) fn detach(&mut self, id: NodeId) {
        let Some(slot) = self.node(id).slot else {
            return;
        };
        self.host_mut(id).remove(slot);
        self.node_mut(id).slot = None;
        let Some(parent) = self.node(id).parent else {
            return;
        };
        for name in self.node(id).declared() {
            let decls = &mut self.node_mut(parent).decls;
            if let Some(list) = decls.get_mut(&name) {
                list.retain(|d| *d != id);
                if list.is_empty() {
                    decls.remove(&name);
                }
            }
        }
    }

    /// Detach and free `id` and its whole subtree.
    pub(crate) fn destroy(&mut self, id: NodeId) {
        self.detach(id);
        self.release(id);
    }

    fn release(&mut self, id: NodeId) {
        ensure_sufficient_stack(|| {
            let children: SmallVec<[NodeId; 8]> =
                self.node(id).children.iter().map(|(_, &c)| c).collect();
            for child in children {
                self.release(child);
            }
        });
        self.pending.purge(id);
        self.stats.destroyed_nodes += 1;
        let kind = self.node(id).kind;
        self.emit(StructureEvent::Removed { node: id, kind });
        let node = self.node_mut(id);
        node.live = false;
        node.children.clear();
        node.decls.clear();
        node.slot = None;
        self.free.push(id);
    }

    /// Build nodes for a parsed subtree under `parent`.
    pub(crate) fn materialize(&mut self, parent: NodeId, parent_start: usize, item: ParsedItem) -> NodeId {
        ensure_sufficient_stack(|| {
            let ParsedItem {
                kind,
                start,
                end,
                name,
                complete,
                detail,
                children,
            } = item;
            let id = self.alloc(kind, Some(parent));
            let node = self.node_mut(id);
            node.name = name;
            node.complete = complete;
            node.detail = detail;
            self.attach(parent, parent_start, id, start, end - start);
            self.stats.created_nodes += 1;
            self.emit(StructureEvent::Added { node: id, kind });
            for child in children {
                self.materialize(id, start, child);
            }
            id
        })
    }

    /// Recompute whether a doc comment directly precedes a declaration.
    /// Siblings in a body are separated only by whitespace.
    pub(crate) fn refresh_doc_comment(&mut self, id: NodeId) {
        if !matches!(
            self.node(id).kind,
            NodeKind::TypeDef | NodeKind::MethodDef | NodeKind::Field
        ) {
            return;
        }
        let documented = self.prev_sibling(id).is_some_and(|prev| {
            self.node(prev).detail == NodeDetail::Comment(CommentStyle::Doc)
        });
        self.node_mut(id).doc_comment = documented;
    }

    // ─── Inspection ───────────────────────────────────────────────

    /// Pre-order summary of every node below the root.
    pub fn dump(&self) -> Vec<NodeSummary> {
        let mut out = Vec::new();
        self.dump_into(self.root, 0, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, base: usize, depth: usize, out: &mut Vec<NodeSummary>) {
        ensure_sufficient_stack(|| {
            for (at, &child) in self.node(id).children.iter() {
                let node = self.node(child);
                let start = base + at.position;
                out.push(NodeSummary {
                    depth,
                    kind: node.kind,
                    start,
                    end: start + at.size,
                    name: node.name.clone(),
                    complete: node.complete,
                    doc_comment: node.doc_comment,
                    detail: node.detail.clone(),
                });
                self.dump_into(child, start, depth + 1, out);
            }
        });
    }

    /// Verify every child tree, parent link, containment, and declaration
    /// map. Meant for tests and debug tooling; O(n).
    pub fn check_invariants(&self) -> Result<(), StructureError> {
        for (index, node) in self.nodes.iter().enumerate() {
            if !node.live {
                continue;
            }
            let id = NodeId::from_index(index);
            node.children
                .check_invariants()
                .map_err(|source| StructureError::Tree { node: id, source })?;
            let size = self.size(id);
            let mut expected: FxHashMap<String, usize> = FxHashMap::default();
            for (at, &child) in node.children.iter() {
                if at.end() > size {
                    return Err(StructureError::ChildOutsideParent {
                        node: id,
                        child,
                        start: at.position,
                        end: at.end(),
                        size,
                    });
                }
                let child_node = self.node(child);
                if child_node.parent != Some(id) || child_node.slot != Some(at.id) {
                    return Err(StructureError::Detached { parent: id, child });
                }
                for name in child_node.declared() {
                    if !node.decls_named(&name).contains(&child) {
                        return Err(StructureError::Declarations { node: id, name });
                    }
                    *expected.entry(name).or_default() += 1;
                }
            }
            for (name, list) in &node.decls {
                if expected.get(name).copied().unwrap_or(0) != list.len() {
                    return Err(StructureError::Declarations {
                        node: id,
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}
