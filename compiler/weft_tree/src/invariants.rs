//! Structural self-checks used by tests and debug tooling.

use crate::node_tree::Color;
use crate::{NodeTree, TreeNodeId};

/// A violated red-black or position invariant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeInvariantError {
    #[error("root entry {0:?} is red")]
    RedRoot(TreeNodeId),
    #[error("red entry {0:?} has a red child")]
    RedRed(TreeNodeId),
    #[error("black height differs below {id:?}: left {left}, right {right}")]
    BlackHeight {
        id: TreeNodeId,
        left: usize,
        right: usize,
    },
    #[error("entry {0:?} has an inconsistent parent link")]
    ParentLink(TreeNodeId),
    #[error("entry {id:?} at {position} starts before the previous end {previous_end}")]
    Overlap {
        id: TreeNodeId,
        position: usize,
        previous_end: usize,
    },
    #[error("tree records {recorded} entries but holds {counted}")]
    Count { recorded: usize, counted: usize },
}

impl<T> NodeTree<T> {
    /// Verify colors, black heights, parent links, and that the
    /// reconstructed spans are ordered and disjoint.
    pub fn check_invariants(&self) -> Result<(), TreeInvariantError> {
        if let Some(root) = self.root {
            if self.slot(root).color == Color::Red {
                return Err(TreeInvariantError::RedRoot(root));
            }
            if self.slot(root).parent.is_some() {
                return Err(TreeInvariantError::ParentLink(root));
            }
            self.black_height(root)?;
        }

        let mut counted = 0;
        let mut previous_end = 0;
        for (located, _) in self.iter() {
            if located.position < previous_end {
                return Err(TreeInvariantError::Overlap {
                    id: located.id,
                    position: located.position,
                    previous_end,
                });
            }
            if located.position != self.position(located.id) {
                return Err(TreeInvariantError::ParentLink(located.id));
            }
            previous_end = located.end();
            counted += 1;
        }
        if counted != self.len() {
            return Err(TreeInvariantError::Count {
                recorded: self.len(),
                counted,
            });
        }
        Ok(())
    }

    fn black_height(&self, id: TreeNodeId) -> Result<usize, TreeInvariantError> {
        let slot = self.slot(id);
        let mut heights = [1, 1];
        for (i, child) in [slot.left, slot.right].into_iter().enumerate() {
            let Some(child) = child else {
                continue;
            };
            let c = self.slot(child);
            if c.parent != Some(id) {
                return Err(TreeInvariantError::ParentLink(child));
            }
            if slot.color == Color::Red && c.color == Color::Red {
                return Err(TreeInvariantError::RedRed(id));
            }
            heights[i] = self.black_height(child)?;
        }
        if heights[0] != heights[1] {
            return Err(TreeInvariantError::BlackHeight {
                id,
                left: heights[0],
                right: heights[1],
            });
        }
        Ok(heights[0] + usize::from(slot.color == Color::Black))
    }
}
