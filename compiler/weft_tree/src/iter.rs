//! In-order iteration with absolute positions.

use crate::{Located, NodeTree, TreeNodeId};

/// In-order iterator over `(Located, &T)` pairs.
///
/// Each step walks to the in-order successor using the previous entry's
/// position, so iteration never re-descends from the root.
pub struct Iter<'a, T> {
    tree: &'a NodeTree<T>,
    next: Option<Located>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Located, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        let payload = self.tree.get(current.id)?;
        Some((current, payload))
    }
}

impl<T> NodeTree<T> {
    /// Iterate every entry in document order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: self,
            next: self.first(),
        }
    }

    /// Resume iteration at `id`, which is yielded first.
    pub fn iter_from(&self, id: TreeNodeId) -> Iter<'_, T> {
        Iter {
            tree: self,
            next: self.contains(id).then(|| self.locate(id)),
        }
    }

    /// Resume iteration at an already located entry.
    pub fn iter_from_located(&self, at: Located) -> Iter<'_, T> {
        Iter {
            tree: self,
            next: Some(at),
        }
    }
}
