use std::sync::Arc;

use egui::{Painter, Rect};

use common::id_type;

id_type!(NodeId);

/// Per-node foreground draw capability, invoked each repaint after the
/// node's base shape so it can layer content on top.
pub type ForegroundRender = Arc<dyn Fn(&Painter, &ViewNode) + Send + Sync>;

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum TitleMode {
    #[default]
    Normal,
    Hidden,
}

/// The slice of the host's node view this subsystem touches. `body_rect`
/// is in canvas coordinates with the title row at its top edge.
pub struct ViewNode {
    pub id: NodeId,
    pub body_rect: Rect,
    pub collapsed: bool,
    pub title_mode: TitleMode,
    pub foreground: Option<ForegroundRender>,
}

impl ViewNode {
    pub fn new(id: NodeId, body_rect: Rect) -> Self {
        Self {
            id,
            body_rect,
            collapsed: false,
            title_mode: TitleMode::Normal,
            foreground: None,
        }
    }

    /// Runs the node's current foreground renderer, if it has one.
    pub fn paint_foreground(&self, painter: &Painter) {
        if let Some(foreground) = &self.foreground {
            foreground(painter, self);
        }
    }
}

impl std::fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewNode")
            .field("id", &self.id)
            .field("body_rect", &self.body_rect)
            .field("collapsed", &self.collapsed)
            .field("title_mode", &self.title_mode)
            .field("foreground", &self.foreground.is_some())
            .finish()
    }
}

/// Type-level defaults shared by every node of one kind; consulted when a
/// node carries no renderer of its own.
#[derive(Clone, Default)]
pub struct NodeArchetype {
    pub default_foreground: Option<ForegroundRender>,
}

impl std::fmt::Debug for NodeArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeArchetype")
            .field("default_foreground", &self.default_foreground.is_some())
            .finish()
    }
}
