use std::time::Instant;

use egui::{pos2, vec2, Color32, FontId, Painter, Rect};

use crate::node::{TitleMode, ViewNode};
use crate::timing::TimingState;

pub const RUNNING_FILL: Color32 = Color32::from_rgb(255, 165, 0);
pub const COMPLETED_FILL: Color32 = Color32::from_rgb(41, 181, 96);

/// Geometry and type the badge is painted with.
#[derive(Debug, Clone)]
pub struct BadgeStyle {
    pub horizontal_padding: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub font: FontId,
    pub text_color: Color32,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            horizontal_padding: 6.0,
            height: 20.0,
            corner_radius: 5.0,
            font: FontId::proportional(12.0),
            text_color: Color32::WHITE,
        }
    }
}

pub fn format_execution_time(execution_time_ms: f64) -> String {
    format!("{:.2}s", execution_time_ms / 1000.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadgeLabel {
    pub text: String,
    pub fill: Color32,
}

/// Label for the given timing state: amber while running, green once a
/// duration has been reported, nothing otherwise.
pub fn badge_label(timing: TimingState, now: Instant) -> Option<BadgeLabel> {
    match timing {
        TimingState::Idle => None,
        TimingState::Running { started_at } => {
            let elapsed = now.saturating_duration_since(started_at);
            Some(BadgeLabel {
                text: format_execution_time(elapsed.as_secs_f64() * 1000.0),
                fill: RUNNING_FILL,
            })
        }
        TimingState::Completed { execution_time } => Some(BadgeLabel {
            text: format_execution_time(execution_time.as_secs_f64() * 1000.0),
            fill: COMPLETED_FILL,
        }),
    }
}

/// Paints the badge immediately above the node's title edge. The badge
/// anchors to the title row, so collapsed and title-less nodes are skipped
/// before any label work happens. Safe to call every repaint; a node with
/// no timing state is a no-op.
pub fn paint_badge(painter: &Painter, node: &ViewNode, timing: TimingState, style: &BadgeStyle) {
    if node.collapsed || node.title_mode == TitleMode::Hidden {
        return;
    }
    let Some(label) = badge_label(timing, Instant::now()) else {
        return;
    };

    let galley = painter.layout_no_wrap(label.text, style.font.clone(), style.text_color);

    let anchor = node.body_rect.min;
    let size = vec2(
        galley.size().x + style.horizontal_padding * 2.0,
        style.height,
    );
    let badge_rect = Rect::from_min_size(pos2(anchor.x, anchor.y - style.height), size);

    painter.rect_filled(badge_rect, style.corner_radius, label.fill);

    let text_pos = pos2(
        badge_rect.min.x + style.horizontal_padding,
        badge_rect.max.y - galley.size().y,
    );
    painter.galley(text_pos, galley, style.text_color);
}
