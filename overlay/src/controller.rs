use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::event::{ExecutionEvent, TimeReport};
use crate::host::{GraphHost, RepaintHost};
use crate::scheduler::RedrawScheduler;
use crate::timing::SharedTable;

/// Applies execution lifecycle notifications to the timing table and keeps
/// the redraw ticker alive exactly while something is being timed.
pub struct LifecycleController {
    table: SharedTable,
    scheduler: RedrawScheduler,
    graph: Arc<dyn GraphHost>,
    repaint: Arc<dyn RepaintHost>,
}

impl LifecycleController {
    pub fn new(
        table: SharedTable,
        graph: Arc<dyn GraphHost>,
        repaint: Arc<dyn RepaintHost>,
    ) -> Self {
        Self {
            table,
            scheduler: RedrawScheduler::default(),
            graph,
            repaint,
        }
    }

    /// Total over every event value; unknown node ids are ignored.
    pub fn handle_event(&mut self, event: ExecutionEvent) {
        match event {
            ExecutionEvent::Started(None) => self.scheduler.stop(),
            ExecutionEvent::Started(Some(node_id)) => {
                if !self.graph.has_node(node_id) {
                    debug!("execution started for unknown node {node_id}");
                    return;
                }
                self.table.lock().begin_run(node_id, Instant::now());
                self.scheduler.start(Arc::clone(&self.repaint));
            }
            // Unconditional: any finish stops the ticker, whichever node ran.
            ExecutionEvent::Finished => self.scheduler.stop(),
            ExecutionEvent::TimeReported(TimeReport {
                node,
                execution_time,
            }) => {
                if !self.graph.has_node(node) {
                    debug!("execution time reported for unknown node {node}");
                    return;
                }
                // Non-finite or negative reports clamp to zero.
                let execution_time =
                    Duration::try_from_secs_f64(execution_time / 1000.0).unwrap_or_default();
                self.table.lock().record_execution_time(node, execution_time);
                self.repaint.request_repaint();
            }
        }
    }

    pub fn scheduler_running(&self) -> bool {
        self.scheduler.is_running()
    }
}

impl std::fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
