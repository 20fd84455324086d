use std::sync::Arc;

use crate::badge::{self, BadgeStyle};
use crate::host::{SettingsHost, SHOW_EXECUTION_TIME, SHOW_EXECUTION_TIME_DEFAULT};
use crate::node::{ForegroundRender, NodeArchetype, ViewNode};
use crate::timing::SharedTable;

/// Ordered fallback for a node's current foreground renderer: the node's
/// own, else its archetype default, else none.
pub fn resolve_foreground(
    node: &ViewNode,
    archetype: &NodeArchetype,
) -> Option<ForegroundRender> {
    node.foreground
        .clone()
        .or_else(|| archetype.default_foreground.clone())
}

/// Replaces the node's foreground renderer with a composite that runs the
/// original and then paints the badge on top. Installs at most once per
/// node; repeat calls from the created and loaded pathways find the
/// side-table marker and leave the first wrapping in place.
pub fn install(
    node: &mut ViewNode,
    archetype: &NodeArchetype,
    table: &SharedTable,
    settings: &Arc<dyn SettingsHost>,
    style: &BadgeStyle,
) {
    if !table.lock().mark_interposed(node.id) {
        return;
    }

    let original = resolve_foreground(node, archetype);
    let table = table.clone();
    let settings = Arc::clone(settings);
    let style = style.clone();

    node.foreground = Some(Arc::new(move |painter, node| {
        if let Some(original) = &original {
            original(painter, node);
        }
        if settings.bool_value(SHOW_EXECUTION_TIME, SHOW_EXECUTION_TIME_DEFAULT) {
            let timing = table.lock().timing(node.id);
            badge::paint_badge(painter, node, timing, &style);
        }
    }));
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use egui::Rect;

    use super::*;
    use crate::node::NodeId;

    fn probe_renderer(calls: Arc<AtomicUsize>) -> ForegroundRender {
        Arc::new(move |_painter, _node| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn own_renderer_wins_over_archetype_default() {
        let own_calls = Arc::new(AtomicUsize::new(0));
        let default_calls = Arc::new(AtomicUsize::new(0));

        let mut node = ViewNode::new(NodeId::unique(), Rect::ZERO);
        node.foreground = Some(probe_renderer(own_calls.clone()));
        let archetype = NodeArchetype {
            default_foreground: Some(probe_renderer(default_calls.clone())),
        };

        let resolved = resolve_foreground(&node, &archetype).unwrap();
        crate::tests::fakes::run_paint_pass(|painter| resolved(painter, &node));

        assert_eq!(own_calls.load(Ordering::SeqCst), 1);
        assert_eq!(default_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn archetype_default_fills_in() {
        let default_calls = Arc::new(AtomicUsize::new(0));

        let node = ViewNode::new(NodeId::unique(), Rect::ZERO);
        let archetype = NodeArchetype {
            default_foreground: Some(probe_renderer(default_calls.clone())),
        };

        let resolved = resolve_foreground(&node, &archetype).unwrap();
        crate::tests::fakes::run_paint_pass(|painter| resolved(painter, &node));

        assert_eq!(default_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_renderer_resolves_to_none() {
        let node = ViewNode::new(NodeId::unique(), Rect::ZERO);
        assert!(resolve_foreground(&node, &NodeArchetype::default()).is_none());
    }
}
