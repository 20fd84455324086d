use serde::{Deserialize, Serialize};

use crate::event::{ExecutionEvent, TimeReport};
use crate::node::NodeId;
use crate::overlay::OverlaySender;

/// Per-node timing of one finished engine run, milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeRunStats {
    pub node_id: NodeId,
    pub run_time: f64,
}

/// Expands a finished run into the lifecycle sequence the overlay
/// understands: one time report per executed node, then the finish mark.
pub fn run_events(stats: &[NodeRunStats]) -> Vec<ExecutionEvent> {
    let mut events = Vec::with_capacity(stats.len() + 1);
    for node_stats in stats {
        events.push(ExecutionEvent::TimeReported(TimeReport {
            node: node_stats.node_id,
            execution_time: node_stats.run_time,
        }));
    }
    events.push(ExecutionEvent::Finished);
    events
}

/// One call per finished run is all an engine needs to drive the overlay.
pub fn report_run(sender: &OverlaySender, stats: &[NodeRunStats]) {
    for event in run_events(stats) {
        sender.send(event);
    }
}
