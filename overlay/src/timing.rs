use std::time::{Duration, Instant};

use hashbrown::HashMap;

use common::Shared;

use crate::node::NodeId;

/// Timing record for one node. Holding a single variant is what keeps the
/// start time and the reported duration mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimingState {
    #[default]
    Idle,
    Running { started_at: Instant },
    Completed { execution_time: Duration },
}

impl TimingState {
    pub fn is_running(&self) -> bool {
        matches!(self, TimingState::Running { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, TimingState::Idle)
    }
}

#[derive(Debug, Default)]
struct NodeEntry {
    timing: TimingState,
    interposed: bool,
}

/// Side-table keyed by node id; the host's node type never carries timing
/// fields or wrap markers. Entries are created on first touch and live for
/// the session.
#[derive(Debug, Default)]
pub struct OverlayTable {
    entries: HashMap<NodeId, NodeEntry>,
}

pub type SharedTable = Shared<OverlayTable>;

impl OverlayTable {
    /// A fresh run replaces whatever the previous run left behind.
    pub fn begin_run(&mut self, node_id: NodeId, started_at: Instant) {
        self.entries.entry(node_id).or_default().timing = TimingState::Running { started_at };
    }

    pub fn record_execution_time(&mut self, node_id: NodeId, execution_time: Duration) {
        self.entries.entry(node_id).or_default().timing =
            TimingState::Completed { execution_time };
    }

    pub fn timing(&self, node_id: NodeId) -> TimingState {
        self.entries
            .get(&node_id)
            .map(|entry| entry.timing)
            .unwrap_or_default()
    }

    /// Returns true the first time a node is marked; later calls see the
    /// existing mark and return false.
    pub fn mark_interposed(&mut self, node_id: NodeId) -> bool {
        let entry = self.entries.entry(node_id).or_default();
        let first = !entry.interposed;
        entry.interposed = true;
        first
    }

    pub fn is_interposed(&self, node_id: NodeId) -> bool {
        self.entries
            .get(&node_id)
            .is_some_and(|entry| entry.interposed)
    }
}
