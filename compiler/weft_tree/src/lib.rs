//! Interval tree with relative offsets.
//!
//! [`NodeTree`] stores payloads ordered by document position. Each entry
//! records its `offset` relative to the base of its subtree rather than an
//! absolute position, so text inserted or removed anywhere only touches the
//! offsets along one root path.
//!
//! # Offset Encoding
//!
//! For an entry `x` with subtree base `B(x)`:
//!
//! - `start(x) = B(x) + x.offset`
//! - the root's base is `0`
//! - a left child shares its parent's base
//! - a right child's base is its parent's end (`start + size`)
//!
//! Rotations and deletions relink slots and adjust offsets; payloads never
//! move between slots, so a [`TreeNodeId`] stays valid for as long as its
//! entry is in the tree.
//!
//! # Key Types
//!
//! - [`NodeTree`] - the red-black tree itself
//! - [`TreeNodeId`] - stable handle for one entry
//! - [`Located`] - an entry with its reconstructed absolute position
//! - [`TreeInvariantError`] - reported by [`NodeTree::check_invariants`]

mod invariants;
mod iter;
mod node_tree;

pub use invariants::TreeInvariantError;
pub use iter::Iter;
pub use node_tree::{Located, NodeTree, TreeNodeId};
