use serde::Serialize;

use crate::ir::{Direction, StepId};

/// Center position of one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub step_id: StepId,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedEdge {
    pub source_step_id: StepId,
    pub target_step_id: StepId,
    /// Empty for the grid layout; callers draw a straight line between centers.
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Layered,
    Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub mode: LayoutMode,
    pub direction: Direction,
    /// Index-aligned with the input steps.
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<RoutedEdge>,
    /// Number of layers; zero for the grid layout.
    pub layer_count: usize,
    pub width: f32,
    pub height: f32,
    pub fallback_reason: Option<String>,
}

impl Layout {
    pub fn empty(direction: Direction) -> Self {
        Self {
            mode: LayoutMode::Layered,
            direction,
            nodes: Vec::new(),
            edges: Vec::new(),
            layer_count: 0,
            width: 0.0,
            height: 0.0,
            fallback_reason: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.mode == LayoutMode::Grid
    }

    pub fn node(&self, step_id: StepId) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.step_id == step_id)
    }
}

/// Width and height reached by any node footprint or edge point, measured from
/// the origin.
pub fn layout_extent(
    nodes: &[LayoutNode],
    edges: &[RoutedEdge],
    node_width: f32,
    node_height: f32,
) -> (f32, f32) {
    let mut width = 0.0f32;
    let mut height = 0.0f32;
    for node in nodes {
        width = width.max(node.x + node_width / 2.0);
        height = height.max(node.y + node_height / 2.0);
    }
    for edge in edges {
        for (x, y) in &edge.points {
            width = width.max(*x);
            height = height.max(*y);
        }
    }
    (width, height)
}
