//! Red-black tree core: allocation, insertion, removal, size changes.

/// Stable handle for one tree entry.
///
/// Valid from [`NodeTree::insert`] until the entry is removed. Slots are
/// recycled afterwards, so callers must drop handles of removed entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeNodeId(u32);

impl TreeNodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw slot index, for diagnostics.
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// An entry together with its reconstructed absolute span.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Located {
    pub id: TreeNodeId,
    pub position: usize,
    pub size: usize,
}

impl Located {
    /// Exclusive end of the entry.
    #[inline]
    pub fn end(&self) -> usize {
        self.position + self.size
    }

    /// Whether `pos` lies strictly inside the span.
    #[inline]
    pub fn strictly_contains(&self, pos: usize) -> bool {
        self.position < pos && pos < self.end()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

#[derive(Clone, Debug)]
pub(crate) struct Slot<T> {
    pub(crate) payload: Option<T>,
    pub(crate) offset: usize,
    pub(crate) size: usize,
    pub(crate) color: Color,
    pub(crate) parent: Option<TreeNodeId>,
    pub(crate) left: Option<TreeNodeId>,
    pub(crate) right: Option<TreeNodeId>,
}

/// Augmented red-black tree keyed by relative offsets.
#[derive(Clone, Debug)]
pub struct NodeTree<T> {
    pub(crate) slots: Vec<Slot<T>>,
    free: Vec<TreeNodeId>,
    pub(crate) root: Option<TreeNodeId>,
    len: usize,
}

impl<T> Default for NodeTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a signed delta to an offset or size.
#[inline]
fn shifted(value: usize, delta: isize) -> usize {
    value.saturating_add_signed(delta)
}

/// Signed difference `new - old` of two sizes.
#[allow(
    clippy::cast_possible_wrap,
    reason = "document sizes stay far below isize::MAX"
)]
#[inline]
fn signed_delta(new: usize, old: usize) -> isize {
    new as isize - old as isize
}

impl<T> NodeTree<T> {
    /// Create an empty tree.
    pub fn new() -> Self {
        NodeTree {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drop every entry and recycle all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// Whether `id` names a live entry.
    pub fn contains(&self, id: TreeNodeId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.payload.is_some())
    }

    pub fn get(&self, id: TreeNodeId) -> Option<&T> {
        self.slots.get(id.index()).and_then(|slot| slot.payload.as_ref())
    }

    pub fn get_mut(&mut self, id: TreeNodeId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .and_then(|slot| slot.payload.as_mut())
    }

    /// Size of an entry.
    pub fn size(&self, id: TreeNodeId) -> usize {
        self.slot(id).size
    }

    /// Absolute start of an entry, reconstructed by walking to the root.
    ///
    /// Every ancestor reached through a right link contributes its
    /// `offset + size`.
    pub fn position(&self, id: TreeNodeId) -> usize {
        let mut pos = self.slot(id).offset;
        let mut cur = id;
        while let Some(parent) = self.slot(cur).parent {
            let p = self.slot(parent);
            if p.right == Some(cur) {
                pos += p.offset + p.size;
            }
            cur = parent;
        }
        pos
    }

    /// Entry with its absolute span.
    pub fn locate(&self, id: TreeNodeId) -> Located {
        Located {
            id,
            position: self.position(id),
            size: self.size(id),
        }
    }

    // ─── Slot Access ──────────────────────────────────────────────

    #[inline]
    pub(crate) fn slot(&self, id: TreeNodeId) -> &Slot<T> {
        &self.slots[id.index()]
    }

    #[inline]
    fn slot_mut(&mut self, id: TreeNodeId) -> &mut Slot<T> {
        &mut self.slots[id.index()]
    }

    #[inline]
    fn is_red(&self, id: Option<TreeNodeId>) -> bool {
        id.is_some_and(|id| self.slot(id).color == Color::Red)
    }

    #[inline]
    fn is_black(&self, id: Option<TreeNodeId>) -> bool {
        !self.is_red(id)
    }

    #[inline]
    fn set_color(&mut self, id: Option<TreeNodeId>, color: Color) {
        if let Some(id) = id {
            self.slot_mut(id).color = color;
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "a tree never holds 2^32 entries"
    )]
    fn alloc(&mut self, payload: T, size: usize) -> TreeNodeId {
        let slot = Slot {
            payload: Some(payload),
            offset: 0,
            size,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        };
        self.len += 1;
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = slot;
            id
        } else {
            self.slots.push(slot);
            TreeNodeId((self.slots.len() - 1) as u32)
        }
    }

    fn release(&mut self, id: TreeNodeId) -> Option<T> {
        let slot = self.slot_mut(id);
        let payload = slot.payload.take();
        slot.parent = None;
        slot.left = None;
        slot.right = None;
        self.free.push(id);
        self.len -= 1;
        payload
    }

    // ─── Insertion ────────────────────────────────────────────────

    /// Insert `payload` spanning `[position, position + size)`.
    ///
    /// The span must not overlap an existing entry. Entries already
    /// starting at `position` stay before the new one.
    pub fn insert(&mut self, payload: T, position: usize, size: usize) -> TreeNodeId {
        let id = self.alloc(payload, size);
        let Some(mut cur) = self.root else {
            let slot = self.slot_mut(id);
            slot.offset = position;
            slot.color = Color::Black;
            self.root = Some(id);
            return id;
        };

        let mut pos = position;
        loop {
            let (offset, size, left, right) = {
                let s = self.slot(cur);
                (s.offset, s.size, s.left, s.right)
            };
            if pos < offset {
                if let Some(left) = left {
                    cur = left;
                } else {
                    self.slot_mut(cur).left = Some(id);
                    break;
                }
            } else {
                debug_assert!(pos >= offset + size, "inserted span overlaps an entry");
                pos = pos.saturating_sub(offset + size);
                if let Some(right) = right {
                    cur = right;
                } else {
                    self.slot_mut(cur).right = Some(id);
                    break;
                }
            }
        }

        let slot = self.slot_mut(id);
        slot.offset = pos;
        slot.parent = Some(cur);
        self.insert_fixup(id);
        id
    }

    fn insert_fixup(&mut self, mut node: TreeNodeId) {
        while let Some(parent) = self.slot(node).parent {
            if self.is_black(Some(parent)) {
                break;
            }
            let Some(grand) = self.slot(parent).parent else {
                break;
            };
            let parent_is_left = self.slot(grand).left == Some(parent);
            let uncle = if parent_is_left {
                self.slot(grand).right
            } else {
                self.slot(grand).left
            };

            if self.is_red(uncle) {
                self.set_color(Some(parent), Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(Some(grand), Color::Red);
                node = grand;
                continue;
            }

            if parent_is_left {
                if self.slot(parent).right == Some(node) {
                    node = parent;
                    self.rotate_left(node);
                }
            } else if self.slot(parent).left == Some(node) {
                node = parent;
                self.rotate_right(node);
            }

            let Some(parent) = self.slot(node).parent else {
                break;
            };
            let Some(grand) = self.slot(parent).parent else {
                break;
            };
            self.set_color(Some(parent), Color::Black);
            self.set_color(Some(grand), Color::Red);
            if parent_is_left {
                self.rotate_right(grand);
            } else {
                self.rotate_left(grand);
            }
        }
        self.set_color(self.root, Color::Black);
    }

    // ─── Rotations ────────────────────────────────────────────────

    fn replace_child(
        &mut self,
        parent: Option<TreeNodeId>,
        old: TreeNodeId,
        new: Option<TreeNodeId>,
    ) {
        match parent {
            None => self.root = new,
            Some(p) => {
                if self.slot(p).left == Some(old) {
                    self.slot_mut(p).left = new;
                } else {
                    self.slot_mut(p).right = new;
                }
            }
        }
    }

    /// Rotate `x` down to the left. The promoted right child now shares
    /// `x`'s old base, so it absorbs `x.offset + x.size`.
    fn rotate_left(&mut self, x: TreeNodeId) {
        let Some(y) = self.slot(x).right else {
            return;
        };
        let shift = self.slot(x).offset + self.slot(x).size;
        self.slot_mut(y).offset += shift;

        let inner = self.slot(y).left;
        self.slot_mut(x).right = inner;
        if let Some(inner) = inner {
            self.slot_mut(inner).parent = Some(x);
        }
        let parent = self.slot(x).parent;
        self.slot_mut(y).parent = parent;
        self.replace_child(parent, x, Some(y));
        self.slot_mut(y).left = Some(x);
        self.slot_mut(x).parent = Some(y);
    }

    /// Rotate `x` down to the right. `x` becomes a right child based at the
    /// promoted node's end.
    fn rotate_right(&mut self, x: TreeNodeId) {
        let Some(y) = self.slot(x).left else {
            return;
        };
        let shift = self.slot(y).offset + self.slot(y).size;
        self.slot_mut(x).offset -= shift;

        let inner = self.slot(y).right;
        self.slot_mut(x).left = inner;
        if let Some(inner) = inner {
            self.slot_mut(inner).parent = Some(x);
        }
        let parent = self.slot(x).parent;
        self.slot_mut(y).parent = parent;
        self.replace_child(parent, x, Some(y));
        self.slot_mut(y).right = Some(x);
        self.slot_mut(x).parent = Some(y);
    }

    /// Add `delta` to `start` and every node on its left spine. These share
    /// one base, so this re-bases the whole subtree.
    fn shift_left_spine(&mut self, start: TreeNodeId, delta: isize) {
        let mut cur = Some(start);
        while let Some(id) = cur {
            let slot = self.slot_mut(id);
            slot.offset = shifted(slot.offset, delta);
            cur = slot.left;
        }
    }

    /// Add `delta` to every ancestor that has `id` in its left subtree.
    fn shift_following_ancestors(&mut self, id: TreeNodeId, delta: isize) {
        let mut cur = id;
        while let Some(parent) = self.slot(cur).parent {
            if self.slot(parent).left == Some(cur) {
                let slot = self.slot_mut(parent);
                slot.offset = shifted(slot.offset, delta);
            }
            cur = parent;
        }
    }

    // ─── Removal ──────────────────────────────────────────────────

    /// Remove an entry, keeping the positions of all others.
    ///
    /// Returns `None` if `id` is not a live entry.
    pub fn remove(&mut self, id: TreeNodeId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        let (left, right, parent, color, offset, size) = {
            let s = self.slot(id);
            (s.left, s.right, s.parent, s.color, s.offset, s.size)
        };

        let removed_color;
        let fix_node;
        let fix_parent;

        if let (Some(left), Some(right)) = (left, right) {
            // The in-order predecessor takes this entry's place.
            let mut pred = left;
            let mut rel = 0;
            while let Some(next) = self.slot(pred).right {
                rel += self.slot(pred).offset + self.slot(pred).size;
                pred = next;
            }
            rel += self.slot(pred).offset;
            let pred_end = rel + self.slot(pred).size;

            removed_color = self.slot(pred).color;
            fix_node = self.slot(pred).left;

            if pred == left {
                fix_parent = Some(pred);
            } else {
                let pred_parent = self.slot(pred).parent;
                fix_parent = pred_parent;
                if let Some(pp) = pred_parent {
                    self.slot_mut(pp).right = fix_node;
                }
                if let Some(child) = fix_node {
                    self.slot_mut(child).parent = pred_parent;
                }
                self.slot_mut(pred).left = Some(left);
                self.slot_mut(left).parent = Some(pred);
            }

            self.slot_mut(pred).right = Some(right);
            self.slot_mut(right).parent = Some(pred);
            self.shift_left_spine(right, signed_delta(offset + size, pred_end));

            let slot = self.slot_mut(pred);
            slot.offset = rel;
            slot.color = color;
            slot.parent = parent;
            self.replace_child(parent, id, Some(pred));
        } else {
            let child = left.or(right);
            if left.is_none() {
                if let Some(right) = right {
                    self.shift_left_spine(right, signed_delta(offset + size, 0));
                }
            }
            removed_color = color;
            fix_node = child;
            fix_parent = parent;
            self.replace_child(parent, id, child);
            if let Some(child) = child {
                self.slot_mut(child).parent = parent;
            }
        }

        if removed_color == Color::Black {
            self.delete_fixup(fix_node, fix_parent);
        }
        self.release(id)
    }

    fn delete_fixup(&mut self, mut node: Option<TreeNodeId>, mut parent: Option<TreeNodeId>) {
        while node != self.root && self.is_black(node) {
            let Some(p) = parent else {
                break;
            };
            let is_left = self.slot(p).left == node;
            let mut sibling = if is_left {
                self.slot(p).right
            } else {
                self.slot(p).left
            };

            if self.is_red(sibling) {
                self.set_color(sibling, Color::Black);
                self.set_color(Some(p), Color::Red);
                if is_left {
                    self.rotate_left(p);
                    sibling = self.slot(p).right;
                } else {
                    self.rotate_right(p);
                    sibling = self.slot(p).left;
                }
            }

            let Some(s) = sibling else {
                node = Some(p);
                parent = self.slot(p).parent;
                continue;
            };

            let (near, far) = if is_left {
                (self.slot(s).left, self.slot(s).right)
            } else {
                (self.slot(s).right, self.slot(s).left)
            };

            if self.is_black(near) && self.is_black(far) {
                self.set_color(Some(s), Color::Red);
                node = Some(p);
                parent = self.slot(p).parent;
                continue;
            }

            let mut s = s;
            if self.is_black(far) {
                self.set_color(near, Color::Black);
                self.set_color(Some(s), Color::Red);
                if is_left {
                    self.rotate_right(s);
                } else {
                    self.rotate_left(s);
                }
                let next = if is_left {
                    self.slot(p).right
                } else {
                    self.slot(p).left
                };
                let Some(next) = next else {
                    break;
                };
                s = next;
            }

            let parent_color = self.slot(p).color;
            self.slot_mut(s).color = parent_color;
            self.set_color(Some(p), Color::Black);
            let far = if is_left {
                self.slot(s).right
            } else {
                self.slot(s).left
            };
            self.set_color(far, Color::Black);
            if is_left {
                self.rotate_left(p);
            } else {
                self.rotate_right(p);
            }
            node = self.root;
            parent = None;
        }
        self.set_color(node, Color::Black);
    }

    // ─── Size Changes ─────────────────────────────────────────────

    /// Change an entry's size, sliding every following entry by the delta.
    pub fn resize(&mut self, id: TreeNodeId, new_size: usize) {
        let old = self.slot(id).size;
        if old == new_size {
            return;
        }
        self.slot_mut(id).size = new_size;
        self.shift_following_ancestors(id, signed_delta(new_size, old));
    }

    /// Change an entry's size without moving following entries.
    ///
    /// The caller guarantees the new span overlaps nothing.
    pub fn set_size(&mut self, id: TreeNodeId, new_size: usize) {
        let old = self.slot(id).size;
        if old == new_size {
            return;
        }
        self.slot_mut(id).size = new_size;
        if let Some(right) = self.slot(id).right {
            self.shift_left_spine(right, signed_delta(old, new_size));
        }
    }

    /// Move an entry and everything after it by `delta`.
    pub fn slide(&mut self, id: TreeNodeId, delta: isize) {
        if delta == 0 {
            return;
        }
        let slot = self.slot_mut(id);
        slot.offset = shifted(slot.offset, delta);
        self.shift_following_ancestors(id, delta);
    }

    /// Move an entry's start by `delta`, keeping its end fixed.
    pub fn slide_start(&mut self, id: TreeNodeId, delta: isize) {
        let slot = self.slot_mut(id);
        slot.offset = shifted(slot.offset, delta);
        slot.size = shifted(slot.size, -delta);
    }

    // ─── Lookup ───────────────────────────────────────────────────

    /// Leftmost entry whose span covers `pos`, both ends inclusive.
    pub fn find_node_at(&self, pos: usize) -> Option<Located> {
        self.find_node_at_or_after(pos)
            .filter(|found| found.position <= pos)
    }

    /// The entry containing `pos`, or else the last entry before it.
    pub fn find_node_at_or_before(&self, pos: usize) -> Option<Located> {
        let mut cur = self.root;
        let mut base = 0;
        let mut best = None;
        while let Some(id) = cur {
            let s = self.slot(id);
            let start = base + s.offset;
            if start <= pos {
                best = Some(Located {
                    id,
                    position: start,
                    size: s.size,
                });
                base = start + s.size;
                cur = s.right;
            } else {
                cur = s.left;
            }
        }
        best
    }

    /// First entry whose end is at or after `pos`.
    pub fn find_node_at_or_after(&self, pos: usize) -> Option<Located> {
        let mut cur = self.root;
        let mut base = 0;
        let mut best = None;
        while let Some(id) = cur {
            let s = self.slot(id);
            let start = base + s.offset;
            let end = start + s.size;
            if end >= pos {
                best = Some(Located {
                    id,
                    position: start,
                    size: s.size,
                });
                cur = s.left;
            } else {
                base = end;
                cur = s.right;
            }
        }
        best
    }

    /// First entry in document order.
    pub fn first(&self) -> Option<Located> {
        let mut cur = self.root?;
        let mut pos = self.slot(cur).offset;
        while let Some(left) = self.slot(cur).left {
            cur = left;
            pos = self.slot(cur).offset;
        }
        Some(Located {
            id: cur,
            position: pos,
            size: self.slot(cur).size,
        })
    }

    /// Last entry in document order.
    pub fn last(&self) -> Option<Located> {
        let mut cur = self.root?;
        let mut base = 0;
        while let Some(right) = self.slot(cur).right {
            base += self.slot(cur).offset + self.slot(cur).size;
            cur = right;
        }
        Some(Located {
            id: cur,
            position: base + self.slot(cur).offset,
            size: self.slot(cur).size,
        })
    }

    /// In-order successor of a located entry.
    pub fn next_sibling(&self, at: Located) -> Option<Located> {
        if let Some(right) = self.slot(at.id).right {
            let base = at.end();
            let mut cur = right;
            while let Some(left) = self.slot(cur).left {
                cur = left;
            }
            return Some(Located {
                id: cur,
                position: base + self.slot(cur).offset,
                size: self.slot(cur).size,
            });
        }

        let mut base = at.position - self.slot(at.id).offset;
        let mut cur = at.id;
        while let Some(parent) = self.slot(cur).parent {
            let p = self.slot(parent);
            if p.left == Some(cur) {
                return Some(Located {
                    id: parent,
                    position: base + p.offset,
                    size: p.size,
                });
            }
            base -= p.offset + p.size;
            cur = parent;
        }
        None
    }

    /// In-order predecessor of a located entry.
    pub fn prev_sibling(&self, at: Located) -> Option<Located> {
        let base = at.position - self.slot(at.id).offset;
        if let Some(left) = self.slot(at.id).left {
            let mut base = base;
            let mut cur = left;
            while let Some(right) = self.slot(cur).right {
                base += self.slot(cur).offset + self.slot(cur).size;
                cur = right;
            }
            return Some(Located {
                id: cur,
                position: base + self.slot(cur).offset,
                size: self.slot(cur).size,
            });
        }

        let mut cur = at.id;
        while let Some(parent) = self.slot(cur).parent {
            let p = self.slot(parent);
            if p.right == Some(cur) {
                // `base` is this subtree's base, i.e. the parent's end.
                return Some(Located {
                    id: parent,
                    position: base - p.size,
                    size: p.size,
                });
            }
            cur = parent;
        }
        None
    }

    /// Convenience: successor by id.
    pub fn next(&self, id: TreeNodeId) -> Option<Located> {
        self.next_sibling(self.locate(id))
    }

    /// Convenience: predecessor by id.
    pub fn prev(&self, id: TreeNodeId) -> Option<Located> {
        self.prev_sibling(self.locate(id))
    }
}
