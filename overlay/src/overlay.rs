use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::error;

use crate::badge::BadgeStyle;
use crate::controller::LifecycleController;
use crate::event::ExecutionEvent;
use crate::host::{
    GraphHost, RepaintHost, SettingsHost, SHOW_EXECUTION_TIME, SHOW_EXECUTION_TIME_DEFAULT,
    SHOW_EXECUTION_TIME_LABEL,
};
use crate::interpose;
use crate::node::{NodeArchetype, NodeId, ViewNode};
use crate::timing::{SharedTable, TimingState};

#[derive(Debug)]
enum PumpMessage {
    Exit,
    Event(ExecutionEvent),
}

/// Sender half handed to the host event bus; notifications pushed through
/// it reach the controller in delivery order.
#[derive(Debug, Clone)]
pub struct OverlaySender {
    tx: UnboundedSender<PumpMessage>,
}

impl OverlaySender {
    pub fn send(&self, event: ExecutionEvent) {
        if self.tx.send(PumpMessage::Event(event)).is_err() {
            error!("execution event dropped: the overlay pump has exited");
        }
    }
}

/// The execution-time badge subsystem. Owns the timing side-table and a
/// pump task that feeds lifecycle events to the controller; hands the host
/// a sender for its bus and two node hooks for interposition.
pub struct ExecutionTimeOverlay {
    table: SharedTable,
    settings: Arc<dyn SettingsHost>,
    style: BadgeStyle,
    tx: UnboundedSender<PumpMessage>,
    pump: Option<JoinHandle<()>>,
}

impl ExecutionTimeOverlay {
    /// Registers the enabling setting and starts the event pump.
    pub fn spawn(
        settings: Arc<dyn SettingsHost>,
        graph: Arc<dyn GraphHost>,
        repaint: Arc<dyn RepaintHost>,
    ) -> Self {
        settings.register_bool(
            SHOW_EXECUTION_TIME,
            SHOW_EXECUTION_TIME_LABEL,
            SHOW_EXECUTION_TIME_DEFAULT,
        );

        let table = SharedTable::default();
        let controller = LifecycleController::new(table.clone(), graph, repaint);

        let (tx, rx) = unbounded_channel::<PumpMessage>();
        let pump = tokio::spawn(pump_loop(rx, controller));

        Self {
            table,
            settings,
            style: BadgeStyle::default(),
            tx,
            pump: Some(pump),
        }
    }

    pub fn sender(&self) -> OverlaySender {
        OverlaySender {
            tx: self.tx.clone(),
        }
    }

    /// Hook for a freshly created node.
    pub fn node_created(&self, node: &mut ViewNode, archetype: &NodeArchetype) {
        interpose::install(node, archetype, &self.table, &self.settings, &self.style);
    }

    /// Hook for a node loaded from a saved graph; same idempotent wrapping
    /// as `node_created`, whichever runs first wins.
    pub fn node_loaded(&self, node: &mut ViewNode, archetype: &NodeArchetype) {
        interpose::install(node, archetype, &self.table, &self.settings, &self.style);
    }

    /// Current timing record for a node, `Idle` when it has none.
    pub fn timing(&self, node_id: NodeId) -> TimingState {
        self.table.lock().timing(node_id)
    }

    pub fn exit(&mut self) {
        self.tx.send(PumpMessage::Exit).ok();
        self.pump.take();
    }
}

impl std::fmt::Debug for ExecutionTimeOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionTimeOverlay")
            .field("table", &self.table)
            .field("style", &self.style)
            .field("pump", &self.pump.is_some())
            .finish()
    }
}

impl Drop for ExecutionTimeOverlay {
    fn drop(&mut self) {
        if self.pump.is_some() {
            error!("overlay dropped while the pump is still running; call exit() first");
        }
    }
}

async fn pump_loop(mut rx: UnboundedReceiver<PumpMessage>, mut controller: LifecycleController) {
    while let Some(msg) = rx.recv().await {
        match msg {
            PumpMessage::Exit => break,
            PumpMessage::Event(event) => controller.handle_event(event),
        }
    }
    // Dropping the controller stops any live ticker.
}
