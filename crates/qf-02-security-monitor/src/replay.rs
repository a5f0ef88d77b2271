//! Bounded replay cache over recently seen submissions.

use shared_types::{Hash, NodeId};
use std::collections::{HashSet, VecDeque};

/// One remembered submission.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReplayEntry {
    node_id: NodeId,
    payload_hash: Hash,
    seen_at: u64,
}

/// Sliding-window record of `(node, payload)` pairs.
///
/// Entries expire after the retention window; a hard capacity cap evicts the
/// oldest entries first so memory stays bounded under flooding.
#[derive(Debug)]
pub struct ReplayCache {
    entries: VecDeque<ReplayEntry>,
    seen: HashSet<(NodeId, Hash)>,
    retention_secs: u64,
    capacity: usize,
}

impl ReplayCache {
    pub fn new(retention_secs: u64, capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            seen: HashSet::new(),
            retention_secs,
            capacity,
        }
    }

    /// Record a submission. Returns `false` if the pair was already seen
    /// within the retention window (a replay).
    pub fn insert(&mut self, node_id: NodeId, payload_hash: Hash, now: u64) -> bool {
        self.prune(now);

        if !self.seen.insert((node_id, payload_hash)) {
            return false;
        }

        self.entries.push_back(ReplayEntry {
            node_id,
            payload_hash,
            seen_at: now,
        });

        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                self.seen.remove(&(evicted.node_id, evicted.payload_hash));
            }
        }
        true
    }

    /// Whether the pair is currently tracked.
    pub fn contains(&self, node_id: &NodeId, payload_hash: &Hash) -> bool {
        self.seen.contains(&(*node_id, *payload_hash))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries older than the retention window.
    fn prune(&mut self, now: u64) {
        let cutoff = now.saturating_sub(self.retention_secs);
        while let Some(front) = self.entries.front() {
            if front.seen_at >= cutoff {
                break;
            }
            let key = (front.node_id, front.payload_hash);
            self.entries.pop_front();
            self.seen.remove(&key);
        }
    }
}
