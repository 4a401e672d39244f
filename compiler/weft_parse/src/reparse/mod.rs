//! The incremental reparse driver.
//!
//! A request names a sequence node (compilation unit, type body, or block
//! body) and a position. The driver backs up to the last child that is a
//! safe place to resume, lifts every later child out into a queue, and
//! parses forward one piece at a time. As soon as the parse lands exactly
//! on the start of a queued child that no edit has touched, that child and
//! everything after it go back unchanged.
//!
//! When a body's extent changes (its closing brace moved) the change
//! propagates outward: the owning container is resized and the sequence
//! holding the owner resumes parsing from the owner's new end.

mod queue;

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::grammar::{BodyContext, Parser, Piece};
use crate::kind::{NodeDetail, NodeKind};
use crate::node::{NodeChange, NodeId};
use crate::syntax_tree::{StructureEvent, SyntaxTree};

pub use queue::{ReparseQueue, ReparseRequest, ReparseStats};

/// Result of one call to [`SyntaxTree::reparse_step`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReparseStep {
    /// Nothing was pending.
    Idle,
    /// The parse of `node` completed. `change` is what the node reported
    /// to its parent: [`NodeChange::Ok`], `Grew` or `Shrunk`.
    Finished { node: NodeId, change: NodeChange },
    /// The budget ran out; the continuation is back in the queue.
    Suspended(ReparseRequest),
}

/// A child lifted out of its parent while the parse runs over it.
#[derive(Copy, Clone, Debug)]
struct Queued {
    id: NodeId,
    start: usize,
    size: usize,
}

/// How a sequence's parse came to an end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Ending {
    /// The rest of the old children were spliced back.
    Rejoined,
    /// A closing brace at this position.
    Closed(usize),
    EndOfInput,
}

enum Drive {
    Done(Ending),
    Suspended(usize),
}

impl SyntaxTree {
    /// Whether reparse work is queued.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Queued requests, in no particular order.
    pub fn pending_requests(&self) -> impl Iterator<Item = &ReparseRequest> {
        self.pending.iter()
    }

    /// Run the earliest pending request, parsing about `budget` bytes
    /// before suspending. Suspension only happens after an item that is a
    /// safe resume point, so a long run without one finishes regardless.
    /// `src` is the current document text.
    #[tracing::instrument(level = "debug", skip_all, fields(budget))]
    pub fn reparse_step(&mut self, src: &str, budget: usize) -> ReparseStep {
        let Some(request) = self.pending.pop() else {
            return ReparseStep::Idle;
        };
        if !self.is_live(request.node) || !self.node(request.node).kind.is_sequence() {
            return ReparseStep::Finished {
                node: request.node,
                change: NodeChange::Ok,
            };
        }
        debug!(?request, "reparse");
        let node = request.node;
        let base = self.start(node);
        let from = self.resume_point(node, base, request.resume_at);
        let queued = self.lift_children(node, base, from);
        match self.drive(src, node, base, from, queued, request.reuse_after, budget) {
            Drive::Suspended(at) => {
                self.stats.suspensions += 1;
                // One past the parsed region, so the continuation resumes
                // right after the last item rather than reparsing it. Items
                // from this pass must not be taken for reusable children if
                // a later edit pulls the resume point back before them.
                let next = ReparseRequest {
                    node,
                    resume_at: at + 1,
                    reuse_after: request.reuse_after.max(at + 1),
                };
                self.pending.schedule(next.node, next.resume_at, next.reuse_after);
                trace!(at, "suspended");
                ReparseStep::Suspended(next)
            }
            Drive::Done(ending) => ReparseStep::Finished {
                node,
                change: self.settle(src, node, ending),
            },
        }
    }

    /// Run every pending request to completion.
    pub fn flush(&mut self, src: &str) {
        while !matches!(self.reparse_step(src, usize::MAX), ReparseStep::Idle) {}
    }

    /// A child ends a complete construct and nothing after it can change
    /// how it parsed.
    fn is_resume_point(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.kind.is_delimiting() && node.complete
    }

    /// Start of the parse for a request at `resume_at`: the end of the last
    /// resume-point child that ends strictly before it, or the node's
    /// start. Strictly, so a token that an edit extends at its end is
    /// rescanned.
    fn resume_point(&self, node: NodeId, base: usize, resume_at: usize) -> usize {
        let tree = &self.node(node).children;
        let rel = resume_at.saturating_sub(base);
        let mut at = tree.find_node_at_or_before(rel);
        while let Some(loc) = at {
            let Some(child) = self.payload(node, loc.id) else {
                break;
            };
            if loc.end() < rel && self.is_resume_point(child) {
                return base + loc.end();
            }
            at = tree.prev_sibling(loc);
        }
        base
    }

    /// Detach every child of `node` starting at or after `from`.
    fn lift_children(&mut self, node: NodeId, base: usize, from: usize) -> VecDeque<Queued> {
        let mut queued = VecDeque::new();
        let tree = &self.node(node).children;
        let mut at = tree.find_node_at_or_after(from.saturating_sub(base));
        while let Some(loc) = at {
            let start = base + loc.position;
            if let Some(id) = self.payload(node, loc.id).filter(|_| start >= from) {
                queued.push_back(Queued {
                    id,
                    start,
                    size: loc.size,
                });
            }
            at = tree.next_sibling(loc);
        }
        for q in &queued {
            self.detach(q.id);
        }
        queued
    }

    /// Put queued children back where they were.
    fn rejoin(&mut self, node: NodeId, base: usize, queued: VecDeque<Queued>) {
        for q in queued {
            self.attach(node, base, q.id, q.start, q.size);
        }
    }

    /// Piece-function context for parsing `node` at the current point.
    fn body_context(&self, node: NodeId) -> BodyContext {
        let mut ctx = BodyContext::default();
        if self.node(node).kind == NodeKind::TypeBody {
            if let Some(owner) = self.node(node).parent {
                let owner = self.node(owner);
                ctx.owner = owner.name.clone();
                if let NodeDetail::Type { flavor, .. } = owner.detail {
                    ctx.flavor = Some(flavor);
                }
            }
        }
        let tree = &self.node(node).children;
        let mut at = tree.last();
        ctx.leading = true;
        while let Some(loc) = at {
            if self
                .payload(node, loc.id)
                .is_some_and(|child| self.node(child).kind != NodeKind::Comment)
            {
                ctx.leading = false;
                break;
            }
            at = tree.prev_sibling(loc);
        }
        ctx
    }

    /// A queued child may be spliced back where the next piece starts.
    fn can_rejoin(&self, q: &Queued, at: usize, reuse_after: usize, ctx: &BodyContext) -> bool {
        if q.start != at || q.start < reuse_after || !self.is_resume_point(q.id) {
            return false;
        }
        // An enum body parses its leading constant list differently from the
        // members after it.
        let constants = matches!(
            self.node(q.id).detail,
            NodeDetail::Variable {
                enum_constants: true,
                ..
            }
        );
        let enum_body = ctx.flavor == Some(crate::kind::TypeFlavor::Enum);
        !enum_body || constants == ctx.leading
    }

    /// Parse `node`'s children forward from `at`.
    #[expect(
        clippy::too_many_arguments,
        reason = "driver state is threaded explicitly through propagation"
    )]
    fn drive(
        &mut self,
        src: &str,
        node: NodeId,
        base: usize,
        mut at: usize,
        mut queued: VecDeque<Queued>,
        reuse_after: usize,
        budget: usize,
    ) -> Drive {
        let kind = self.node(node).kind;
        let mut ctx = self.body_context(node);
        let mut parser = Parser::new(src, at);
        let began = at;
        let mut resumable = false;
        loop {
            while queued.front().is_some_and(|q| q.start < at) {
                if let Some(q) = queued.pop_front() {
                    self.destroy(q.id);
                }
            }
            let next = parser.next_piece_start();
            if queued
                .front()
                .is_some_and(|q| self.can_rejoin(q, next, reuse_after, &ctx))
            {
                trace!(at, count = queued.len(), "rejoin");
                self.stats.splices += 1;
                self.stats.reused_children += queued.len() as u64;
                self.rejoin(node, base, queued);
                return Drive::Done(Ending::Rejoined);
            }
            // Past the node's recorded end the new extent is not applied
            // yet, so keep going until the parse settles.
            if resumable && at - began >= budget && at <= base + self.size(node) {
                self.rejoin(node, base, queued);
                return Drive::Suspended(at);
            }
            self.stats.pieces += 1;
            match parser.piece(kind, &ctx) {
                Piece::Item(item) => {
                    if item.kind != NodeKind::Comment {
                        ctx.leading = false;
                    }
                    at = item.end;
                    resumable = item.kind.is_delimiting() && item.complete;
                    self.materialize(node, base, item);
                }
                Piece::Close(close) => {
                    self.discard(queued);
                    return Drive::Done(Ending::Closed(close));
                }
                Piece::Eof => {
                    self.discard(queued);
                    return Drive::Done(Ending::EndOfInput);
                }
            }
        }
    }

    fn discard(&mut self, queued: VecDeque<Queued>) {
        for q in queued {
            self.destroy(q.id);
        }
    }

    /// Apply a finished parse of `node` and let each parent react to the
    /// change in turn. Returns the change to `node` itself.
    fn settle(&mut self, src: &str, node: NodeId, ending: Ending) -> NodeChange {
        let mut reported = None;
        let mut node = node;
        let mut ending = ending;
        loop {
            let change = self.apply_ending(src, node, ending);
            reported.get_or_insert(change);
            let Some(owner) = self.node(node).parent else {
                break;
            };
            let Some((seq, resumed)) = self.propagate(src, owner, change) else {
                break;
            };
            node = seq;
            ending = resumed;
        }
        reported.unwrap_or(NodeChange::Ok)
    }

    /// Fit `node` to where its parse ended.
    fn apply_ending(&mut self, src: &str, node: NodeId, ending: Ending) -> NodeChange {
        let new_end = match ending {
            Ending::Rejoined => return NodeChange::Ok,
            Ending::Closed(at) => at,
            Ending::EndOfInput => src.len(),
        };
        let base = self.start(node);
        let old_end = base + self.size(node);
        if new_end == old_end {
            return NodeChange::Ok;
        }
        let change = if new_end > old_end {
            self.stats.grown += 1;
            NodeChange::Grew { old_end, new_end }
        } else {
            self.stats.shrunk += 1;
            NodeChange::Shrunk { old_end, new_end }
        };
        debug!(?node, ?change, "extent changed");
        self.set_size(node, new_end - base);
        self.emit(StructureEvent::Resized {
            node,
            old_end,
            new_end,
        });
        change
    }

    /// A body of `owner` reported `change`. Fit the owner around it and
    /// reparse the enclosing sequence after the owner.
    fn propagate(
        &mut self,
        src: &str,
        owner: NodeId,
        change: NodeChange,
    ) -> Option<(NodeId, Ending)> {
        let body_end = match change {
            NodeChange::Ok | NodeChange::Remove => return None,
            NodeChange::Grew { new_end, .. } | NodeChange::Shrunk { new_end, .. } => new_end,
        };
        let parent = self.node(owner).parent?;
        if !self.node(parent).kind.is_sequence() {
            return self.rebuild_statement(src, owner);
        }
        // A closing brace always lies before the end of the text.
        let closed = body_end < src.len();
        let owner_start = self.start(owner);
        let old_end = owner_start + self.size(owner);
        let new_end = if closed { body_end + 1 } else { src.len() };
        self.node_mut(owner).complete = closed;
        if matches!(change, NodeChange::Grew { .. }) {
            self.destroy_siblings_before(owner, new_end);
        }
        self.set_size(owner, new_end - owner_start);
        self.emit(StructureEvent::Resized {
            node: owner,
            old_end,
            new_end,
        });
        let base = self.start(parent);
        let queued = self.lift_children(parent, base, new_end);
        match self.drive(src, parent, base, new_end, queued, new_end, usize::MAX) {
            Drive::Done(ending) => Some((parent, ending)),
            Drive::Suspended(_) => None,
        }
    }

    /// Destroy `id`'s later siblings that start before `limit`.
    fn destroy_siblings_before(&mut self, id: NodeId, limit: usize) {
        while let Some(next) = self.next_sibling(id) {
            if self.start(next) >= limit {
                break;
            }
            self.destroy(next);
        }
    }

    /// The owner sits inside an `if`, loop, or similar, which cannot refit
    /// it and answers [`NodeChange::Remove`]. Throw away the whole statement
    /// and reparse the sequence holding it from the statement's start.
    fn rebuild_statement(&mut self, src: &str, owner: NodeId) -> Option<(NodeId, Ending)> {
        let statement = self.ancestors(owner).find(|&a| {
            self.node(a)
                .parent
                .is_some_and(|p| self.node(p).kind.is_sequence())
        })?;
        let seq = self.node(statement).parent?;
        let start = self.start(statement);
        debug!(?statement, start, "rebuilding enclosing statement");
        self.destroy(statement);
        let base = self.start(seq);
        let from = self.resume_point(seq, base, start);
        let queued = self.lift_children(seq, base, from);
        match self.drive(src, seq, base, from, queued, start, usize::MAX) {
            Drive::Done(ending) => Some((seq, ending)),
            Drive::Suspended(_) => None,
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
