use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::host::RepaintHost;

/// Tick rate of the running-badge counter. Fast enough to read as live,
/// cheap enough to not matter for the render loop.
pub const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Process-wide repaint ticker. A live handle means at least one node is
/// actively timing; the ticker itself knows nothing about nodes.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    ticker: Option<JoinHandle<()>>,
}

impl RedrawScheduler {
    /// Idempotent; a running ticker is left alone.
    pub fn start(&mut self, repaint: Arc<dyn RepaintHost>) {
        if self.ticker.is_some() {
            return;
        }

        self.ticker = Some(tokio::spawn(async move {
            let first_tick = tokio::time::Instant::now() + REDRAW_INTERVAL;
            let mut interval = tokio::time::interval_at(first_tick, REDRAW_INTERVAL);
            loop {
                interval.tick().await;
                repaint.request_repaint();
            }
        }));
    }

    /// Idempotent; stopping a stopped scheduler is a no-op.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }
}

impl Drop for RedrawScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
