use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Payload of the custom time-reported channel. `execution_time` is in
/// milliseconds, as the bus reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeReport {
    pub node: NodeId,
    pub execution_time: f64,
}

/// Execution lifecycle notifications delivered by the host bus. `Started`
/// with no node id means nothing is executing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExecutionEvent {
    Started(Option<NodeId>),
    Finished,
    TimeReported(TimeReport),
}

impl From<TimeReport> for ExecutionEvent {
    fn from(report: TimeReport) -> Self {
        ExecutionEvent::TimeReported(report)
    }
}
