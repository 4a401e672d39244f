//! Edit bookkeeping.
//!
//! An edit notification walks down from the root. Every node on the way
//! adjusts its own size first; the innermost node that can absorb the edit
//! schedules a reparse of itself, and a node that cannot tells its parent to
//! remove it. No parsing happens here.

use tracing::trace;
use weft_tree::Located;

use crate::node::{NodeChange, NodeId};
use crate::syntax_tree::SyntaxTree;

impl SyntaxTree {
    /// `len` bytes were inserted at `pos`.
    pub fn text_inserted(&mut self, pos: usize, len: usize) {
        if len == 0 {
            return;
        }
        trace!(pos, len, "text inserted");
        self.pending.shift_for_insert(pos, len);
        let root = self.root();
        self.insert_into(root, 0, pos, len);
    }

    /// `len` bytes at `pos` were removed.
    pub fn text_removed(&mut self, pos: usize, len: usize) {
        if len == 0 {
            return;
        }
        trace!(pos, len, "text removed");
        self.pending.shift_for_removal(pos, len);
        let root = self.root();
        self.remove_from(root, 0, pos, len);
    }

    fn insert_into(&mut self, node: NodeId, start: usize, pos: usize, len: usize) -> NodeChange {
        self.resize_by(node, signed(len));
        let sequence = self.node(node).kind.is_sequence();
        let rel = pos - start;
        if let Some((loc, child)) = self.absorbing_child(node, rel, rel) {
            match self.insert_into(child, start + loc.position, pos, len) {
                NodeChange::Remove if sequence => {
                    self.destroy(child);
                    self.pending.schedule(node, pos, pos);
                    return NodeChange::Ok;
                }
                change => return change,
            }
        }
        if !sequence {
            return NodeChange::Remove;
        }
        self.insert_between_children(node, rel, len);
        self.pending.schedule(node, pos, pos);
        NodeChange::Ok
    }

    fn remove_from(&mut self, node: NodeId, start: usize, pos: usize, len: usize) -> NodeChange {
        self.resize_by(node, -signed(len));
        let sequence = self.node(node).kind.is_sequence();
        let rel = pos - start;
        if let Some((loc, child)) = self.absorbing_child(node, rel, rel + len) {
            match self.remove_from(child, start + loc.position, pos, len) {
                NodeChange::Remove if sequence => {
                    self.destroy(child);
                    self.pending.schedule(node, pos, pos);
                    return NodeChange::Ok;
                }
                change => return change,
            }
        }
        if !sequence {
            return NodeChange::Remove;
        }
        self.remove_across_children(node, rel, rel + len, len);
        self.pending.schedule(node, pos, pos);
        NodeChange::Ok
    }

    /// The child that an edit of `[from, to)` (relative to `node`) falls
    /// inside. Interiors always qualify; bodies also take edits touching
    /// their boundaries.
    fn absorbing_child(&self, node: NodeId, from: usize, to: usize) -> Option<(Located, NodeId)> {
        let tree = &self.node(node).children;
        let mut at = tree.find_node_at_or_after(from);
        while let Some(loc) = at {
            if loc.position > from {
                return None;
            }
            let child = self.payload(node, loc.id)?;
            let open_ended = self.node(child).kind.grows_forward();
            let inside = if open_ended {
                to <= loc.end()
            } else if from == to {
                loc.strictly_contains(from)
            } else {
                loc.position < from && to <= loc.end()
            };
            if inside {
                return Some((loc, child));
            }
            at = tree.next_sibling(loc);
        }
        None
    }

    /// Text landed between children of a sequence at `rel`.
    fn insert_between_children(&mut self, node: NodeId, rel: usize, len: usize) {
        let tree = &self.node(node).children;
        let mut follow = tree.find_node_at_or_after(rel);
        let mut extended = None;
        if let Some(loc) = follow {
            if loc.end() == rel && loc.position < rel {
                // The child ends at the insertion point. Unless it closes
                // itself, the new text may continue it.
                extended = self
                    .payload(node, loc.id)
                    .filter(|&child| !self.node(child).kind.marks_own_end());
                follow = tree.next_sibling(loc);
            }
        }
        if let Some(loc) = follow {
            self.node_mut(node).children.slide(loc.id, signed(len));
        }
        if let Some(child) = extended {
            self.destroy(child);
        }
    }

    /// `[from, to)` (relative) was removed across children of a sequence.
    fn remove_across_children(&mut self, node: NodeId, from: usize, to: usize, len: usize) {
        let tree = &self.node(node).children;
        let mut at = tree.find_node_at_or_after(from);
        let mut victims = Vec::new();
        let mut follow = None;
        while let Some(loc) = at {
            if loc.position >= to {
                follow = Some(loc);
                break;
            }
            if let Some(child) = self.payload(node, loc.id) {
                let overlaps = loc.end() > from;
                let continued = loc.end() == from && !self.node(child).kind.marks_own_end();
                if overlaps || continued {
                    victims.push(child);
                }
            }
            at = tree.next_sibling(loc);
        }
        for child in victims {
            self.destroy(child);
        }
        if let Some(loc) = follow {
            self.node_mut(node).children.slide(loc.id, -signed(len));
        }
    }
}

fn signed(len: usize) -> isize {
    isize::try_from(len).unwrap_or(isize::MAX)
}
