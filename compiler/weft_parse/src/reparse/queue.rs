//! Deferred reparse requests.

use crate::node::NodeId;

/// Reparse `node`'s children from `resume_at`; existing children starting
/// at or after `reuse_after` are untouched by edits and may be kept.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReparseRequest {
    pub node: NodeId,
    pub resume_at: usize,
    pub reuse_after: usize,
}

/// Pending requests, at most one per node.
#[derive(Clone, Debug, Default)]
pub struct ReparseQueue {
    requests: Vec<ReparseRequest>,
}

impl ReparseQueue {
    /// Add a request, merging with an existing one for the same node so the
    /// merged request covers both dirty regions.
    pub fn schedule(&mut self, node: NodeId, resume_at: usize, reuse_after: usize) {
        if let Some(existing) = self.requests.iter_mut().find(|r| r.node == node) {
            existing.resume_at = existing.resume_at.min(resume_at);
            existing.reuse_after = existing.reuse_after.max(reuse_after);
            return;
        }
        self.requests.push(ReparseRequest {
            node,
            resume_at,
            reuse_after,
        });
    }

    /// Remove and return the request that resumes earliest in the document.
    pub fn pop(&mut self) -> Option<ReparseRequest> {
        let index = self
            .requests
            .iter()
            .enumerate()
            .min_by_key(|(_, r)| r.resume_at)
            .map(|(i, _)| i)?;
        Some(self.requests.remove(index))
    }

    /// Drop any request for `node`.
    pub fn purge(&mut self, node: NodeId) {
        self.requests.retain(|r| r.node != node);
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReparseRequest> {
        self.requests.iter()
    }

    /// Track `len` bytes inserted at `pos`.
    pub fn shift_for_insert(&mut self, pos: usize, len: usize) {
        for r in &mut self.requests {
            if r.resume_at > pos {
                r.resume_at += len;
            }
            if r.reuse_after > pos {
                r.reuse_after += len;
            }
        }
    }

    /// Track `len` bytes removed at `pos`.
    pub fn shift_for_removal(&mut self, pos: usize, len: usize) {
        let collapse = |at: usize| {
            if at > pos + len {
                at - len
            } else {
                at.min(pos)
            }
        };
        for r in &mut self.requests {
            r.resume_at = collapse(r.resume_at);
            r.reuse_after = collapse(r.reuse_after);
        }
    }
}

/// Counters kept by the reparse driver.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReparseStats {
    /// Partial parses run.
    pub pieces: u64,
    /// Nodes created, descendants included.
    pub created_nodes: u64,
    /// Nodes destroyed, descendants included.
    pub destroyed_nodes: u64,
    /// Times a run of old children was spliced back unchanged.
    pub splices: u64,
    /// Children put back by those splices.
    pub reused_children: u64,
    /// Requests that stopped early on their budget.
    pub suspensions: u64,
    pub grown: u64,
    pub shrunk: u64,
}

impl ReparseStats {
    /// Share of children that were spliced back rather than parsed, as a
    /// percentage.
    #[expect(
        clippy::cast_precision_loss,
        reason = "percentage display; counts stay far below 2^52"
    )]
    pub fn reuse_rate(&self) -> f64 {
        let total = self.reused_children + self.pieces;
        if total == 0 {
            0.0
        } else {
            self.reused_children as f64 / total as f64 * 100.0
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use super::*;

    fn id(n: usize) -> NodeId {
        NodeId::from_index(n)
    }

    #[test]
    fn merges_per_node() {
        let mut queue = ReparseQueue::default();
        queue.schedule(id(1), 40, 40);
        queue.schedule(id(1), 10, 10);
        queue.schedule(id(2), 5, 5);
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.pop(),
            Some(ReparseRequest {
                node: id(2),
                resume_at: 5,
                reuse_after: 5
            })
        );
        assert_eq!(
            queue.pop(),
            Some(ReparseRequest {
                node: id(1),
                resume_at: 10,
                reuse_after: 40
            })
        );
        assert!(queue.pop().is_none());
    }

    #[test]
    fn shifts_with_edits() {
        let mut queue = ReparseQueue::default();
        queue.schedule(id(1), 10, 20);
        queue.shift_for_insert(10, 5);
        let r = *queue.iter().next().unwrap();
        assert_eq!((r.resume_at, r.reuse_after), (10, 25));
        queue.shift_for_removal(5, 10);
        let r = *queue.iter().next().unwrap();
        assert_eq!((r.resume_at, r.reuse_after), (5, 15));
    }

    #[test]
    fn reuse_rate_counts_spliced_children() {
        let mut stats = ReparseStats::default();
        assert!(stats.reuse_rate().abs() < f64::EPSILON);
        stats.reused_children = 3;
        stats.pieces = 1;
        assert!((stats.reuse_rate() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn purge_drops_requests() {
        let mut queue = ReparseQueue::default();
        queue.schedule(id(3), 0, 0);
        queue.purge(id(3));
        assert!(queue.is_empty());
    }
}
