use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use egui::{pos2, vec2, Rect, Shape};

use common::log_setup::setup_logging;

use crate::badge::COMPLETED_FILL;
use crate::event::{ExecutionEvent, TimeReport};
use crate::host::{MemorySettings, SHOW_EXECUTION_TIME};
use crate::node::{NodeArchetype, NodeId, ViewNode};
use crate::overlay::ExecutionTimeOverlay;
use crate::report::{self, NodeRunStats};
use crate::tests::fakes::{marking_renderer, run_paint_pass, CountingRepaint, FixedGraph};
use crate::timing::TimingState;

struct Fixture {
    overlay: ExecutionTimeOverlay,
    settings: Arc<MemorySettings>,
    repaint: Arc<CountingRepaint>,
}

fn fixture(node_ids: impl IntoIterator<Item = NodeId>) -> Fixture {
    setup_logging("debug");

    let settings = Arc::new(MemorySettings::default());
    let repaint = Arc::new(CountingRepaint::default());
    let graph = Arc::new(FixedGraph::with_nodes(node_ids));
    let overlay = ExecutionTimeOverlay::spawn(settings.clone(), graph, repaint.clone());

    Fixture {
        overlay,
        settings,
        repaint,
    }
}

fn test_node(node_id: NodeId) -> ViewNode {
    ViewNode::new(
        node_id,
        Rect::from_min_size(pos2(40.0, 40.0), vec2(120.0, 60.0)),
    )
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn badge_goes_green_after_a_report() {
    let node_id = NodeId::unique();
    let mut fix = fixture([node_id]);
    let mut node = test_node(node_id);
    fix.overlay.node_created(&mut node, &NodeArchetype::default());

    let sender = fix.overlay.sender();
    sender.send(ExecutionEvent::Started(Some(node_id)));
    wait_until(|| fix.overlay.timing(node_id).is_running()).await;

    sender.send(ExecutionEvent::TimeReported(TimeReport {
        node: node_id,
        execution_time: 1530.0,
    }));
    wait_until(|| !fix.overlay.timing(node_id).is_running()).await;
    assert_eq!(
        fix.overlay.timing(node_id),
        TimingState::Completed {
            execution_time: Duration::from_millis(1530)
        }
    );
    assert!(fix.repaint.requests() >= 1);

    let output = run_paint_pass(|painter| node.paint_foreground(painter));
    let Shape::Rect(background) = &output.shapes[0].shape else {
        panic!("expected the badge background");
    };
    assert_eq!(background.fill, COMPLETED_FILL);
    let Shape::Text(text) = &output.shapes[1].shape else {
        panic!("expected the badge text");
    };
    assert_eq!(text.galley.text(), "1.53s");

    sender.send(ExecutionEvent::Finished);
    fix.overlay.exit();
}

#[tokio::test]
async fn double_install_wraps_once() {
    let node_id = NodeId::unique();
    let mut fix = fixture([node_id]);

    let calls = Arc::new(AtomicUsize::new(0));
    let mut node = test_node(node_id);
    node.foreground = Some(marking_renderer(calls.clone()));

    let archetype = NodeArchetype::default();
    fix.overlay.node_created(&mut node, &archetype);
    fix.overlay.node_loaded(&mut node, &archetype);

    let sender = fix.overlay.sender();
    sender.send(ExecutionEvent::TimeReported(TimeReport {
        node: node_id,
        execution_time: 1530.0,
    }));
    wait_until(|| !fix.overlay.timing(node_id).is_idle()).await;

    let output = run_paint_pass(|painter| node.paint_foreground(painter));

    // One wrapping layer: the original circle plus one badge, not two.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(output.shapes.len(), 3);

    fix.overlay.exit();
}

#[tokio::test]
async fn disabled_setting_runs_only_the_original() {
    let node_id = NodeId::unique();
    let mut fix = fixture([node_id]);
    fix.settings.set(SHOW_EXECUTION_TIME, false);

    let calls = Arc::new(AtomicUsize::new(0));
    let mut node = test_node(node_id);
    node.foreground = Some(marking_renderer(calls.clone()));
    fix.overlay.node_created(&mut node, &NodeArchetype::default());

    let sender = fix.overlay.sender();
    sender.send(ExecutionEvent::Started(Some(node_id)));
    wait_until(|| fix.overlay.timing(node_id).is_running()).await;

    let output = run_paint_pass(|painter| node.paint_foreground(painter));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(output.shapes.len(), 1);

    fix.overlay.exit();
}

#[tokio::test]
async fn missing_original_renderer_is_tolerated() {
    let node_id = NodeId::unique();
    let mut fix = fixture([node_id]);

    let mut node = test_node(node_id);
    fix.overlay.node_created(&mut node, &NodeArchetype::default());

    let sender = fix.overlay.sender();
    sender.send(ExecutionEvent::Started(Some(node_id)));
    wait_until(|| fix.overlay.timing(node_id).is_running()).await;

    let output = run_paint_pass(|painter| node.paint_foreground(painter));

    // Badge only: background and text.
    assert_eq!(output.shapes.len(), 2);

    fix.overlay.exit();
}

#[tokio::test]
async fn archetype_default_still_runs_under_the_badge() {
    let node_id = NodeId::unique();
    let mut fix = fixture([node_id]);

    let calls = Arc::new(AtomicUsize::new(0));
    let archetype = NodeArchetype {
        default_foreground: Some(marking_renderer(calls.clone())),
    };
    let mut node = test_node(node_id);
    fix.overlay.node_created(&mut node, &archetype);

    let sender = fix.overlay.sender();
    sender.send(ExecutionEvent::Started(Some(node_id)));
    wait_until(|| fix.overlay.timing(node_id).is_running()).await;

    let output = run_paint_pass(|painter| node.paint_foreground(painter));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(output.shapes.len(), 3);

    fix.overlay.exit();
}

#[tokio::test]
async fn unknown_node_never_ticks() {
    let known = NodeId::unique();
    let mut fix = fixture([known]);
    let unknown = NodeId::unique();

    let sender = fix.overlay.sender();
    sender.send(ExecutionEvent::Started(Some(unknown)));
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(fix.overlay.timing(unknown).is_idle());
    assert_eq!(fix.repaint.requests(), 0);

    fix.overlay.exit();
}

#[tokio::test]
async fn events_apply_in_delivery_order() {
    let node_id = NodeId::unique();
    let mut fix = fixture([node_id]);

    let sender = fix.overlay.sender();
    sender.send(ExecutionEvent::Started(Some(node_id)));
    sender.send(
        TimeReport {
            node: node_id,
            execution_time: 250.0,
        }
        .into(),
    );
    sender.send(ExecutionEvent::Finished);

    wait_until(|| !fix.overlay.timing(node_id).is_idle()).await;
    wait_until(|| !fix.overlay.timing(node_id).is_running()).await;

    assert_eq!(
        fix.overlay.timing(node_id),
        TimingState::Completed {
            execution_time: Duration::from_millis(250)
        }
    );

    fix.overlay.exit();
}

#[tokio::test]
async fn events_after_exit_are_dropped() {
    let node_id = NodeId::unique();
    let mut fix = fixture([node_id]);
    let sender = fix.overlay.sender();

    fix.overlay.exit();

    // Queued behind the exit mark, so the pump never applies it.
    sender.send(ExecutionEvent::Started(Some(node_id)));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(fix.overlay.timing(node_id).is_idle());
}

#[tokio::test]
async fn run_report_drives_every_node() {
    let a = NodeId::unique();
    let b = NodeId::unique();
    let mut fix = fixture([a, b]);

    report::report_run(
        &fix.overlay.sender(),
        &[
            NodeRunStats {
                node_id: a,
                run_time: 120.0,
            },
            NodeRunStats {
                node_id: b,
                run_time: 1530.0,
            },
        ],
    );

    wait_until(|| !fix.overlay.timing(b).is_idle()).await;

    assert_eq!(
        fix.overlay.timing(a),
        TimingState::Completed {
            execution_time: Duration::from_millis(120)
        }
    );
    assert_eq!(
        fix.overlay.timing(b),
        TimingState::Completed {
            execution_time: Duration::from_millis(1530)
        }
    );

    fix.overlay.exit();
}
