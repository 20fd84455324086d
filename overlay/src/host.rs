use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::node::NodeId;

/// Settings key of the enabling flag, registered once at startup and read
/// on every paint.
pub const SHOW_EXECUTION_TIME: &str = "execution_time.show_badge";
pub const SHOW_EXECUTION_TIME_LABEL: &str = "Show Execution Time";
pub const SHOW_EXECUTION_TIME_DEFAULT: bool = true;

/// Host settings store. Values are read live, never cached by the overlay.
pub trait SettingsHost: Send + Sync {
    fn register_bool(&self, key: &str, label: &str, default: bool);
    fn bool_value(&self, key: &str, default: bool) -> bool;
}

/// Host canvas: marks the view dirty so it repaints on its own schedule.
/// Must be callable from any thread.
pub trait RepaintHost: Send + Sync {
    fn request_repaint(&self);
}

impl RepaintHost for egui::Context {
    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }
}

/// Host graph lookup. Timing lives in the overlay's own side-table, so
/// resolving a node id narrows to existence.
pub trait GraphHost: Send + Sync {
    fn has_node(&self, node_id: NodeId) -> bool;
}

/// Settings store for hosts that do not bring their own, and for tests.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, bool>>,
}

impl MemorySettings {
    pub fn set(&self, key: &str, value: bool) {
        self.values.write().insert(key.to_string(), value);
    }

    /// Inverts a flag, returning its previous value.
    pub fn flip(&self, key: &str, default: bool) -> bool {
        let mut values = self.values.write();
        let value = values.entry_ref(key).or_insert(default);
        let was = *value;
        *value = !was;
        was
    }
}

impl SettingsHost for MemorySettings {
    fn register_bool(&self, key: &str, _label: &str, default: bool) {
        self.values.write().entry_ref(key).or_insert(default);
    }

    fn bool_value(&self, key: &str, default: bool) -> bool {
        self.values.read().get(key).copied().unwrap_or(default)
    }
}
