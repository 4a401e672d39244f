//! Incrementally maintained structure for Java-like source text.
//!
//! A [`SyntaxTree`] is the outline of one document: type definitions,
//! methods, fields, statements, comments. It does not own the text; the
//! caller keeps the buffer and reports every change with
//! [`SyntaxTree::text_inserted`] / [`SyntaxTree::text_removed`].
//!
//! # Editing
//!
//! An edit only adjusts sizes and schedules work. Nodes it invalidates are
//! dropped, and the innermost sequence node holding the change (the
//! compilation unit, a type body, or a block body) gets a
//! [`ReparseRequest`]. The requests run later, either all at once with
//! [`SyntaxTree::flush`] or in bounded slices with
//! [`SyntaxTree::reparse_step`]. Untouched children are spliced back
//! rather than rebuilt, so their [`NodeId`]s survive the edit.
//!
//! # Positions
//!
//! Spans are byte offsets. A node stores its span in its parent's
//! [`weft_tree::NodeTree`] relative to the parent, which keeps edit cost
//! logarithmic per level.

mod edit;
mod grammar;
mod kind;
mod marks;
mod node;
mod reparse;
mod stack;
mod syntax_tree;

pub use kind::{CommentStyle, KindFlags, NodeDetail, NodeKind, TypeFlavor};
pub use marks::{MarkToken, MarkTokens};
pub use node::{NodeChange, NodeId, SyntaxNode};
pub use reparse::{ReparseQueue, ReparseRequest, ReparseStats, ReparseStep};
pub use stack::ensure_sufficient_stack;
pub use syntax_tree::{ChildSpan, NodeSummary, Span, StructureError, StructureEvent, SyntaxTree};
pub use weft_lexer::HighlightTag;
