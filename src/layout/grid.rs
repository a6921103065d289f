use crate::config::LayoutConfig;
use crate::ir::{DependencyEdge, Step};

use super::{Layout, LayoutMode, LayoutNode, RoutedEdge, layout_extent};

const FALLBACK_NODE_WIDTH: f32 = 200.0;
const FALLBACK_NODE_HEIGHT: f32 = 72.0;
const FALLBACK_GAP: f32 = 40.0;

/// Row-major grid in input order. Accepts anything: cycles, self-loops,
/// duplicate ids and unusable spacing all produce a layout.
pub(super) fn compute_grid_layout(
    steps: &[Step],
    edges: &[DependencyEdge],
    config: &LayoutConfig,
    reason: Option<String>,
) -> Layout {
    let columns = config.grid_columns.max(1);
    let node_width = usable(config.node_width, FALLBACK_NODE_WIDTH);
    let node_height = usable(config.node_height, FALLBACK_NODE_HEIGHT);
    let column_step = node_width + usable_gap(config.node_gap);
    let row_step = node_height + usable_gap(config.rank_gap);

    let nodes: Vec<LayoutNode> = steps
        .iter()
        .enumerate()
        .map(|(idx, step)| LayoutNode {
            step_id: step.id,
            x: (idx % columns) as f32 * column_step + node_width / 2.0,
            y: (idx / columns) as f32 * row_step + node_height / 2.0,
        })
        .collect();

    let routed: Vec<RoutedEdge> = edges
        .iter()
        .map(|edge| RoutedEdge {
            source_step_id: edge.source_step_id,
            target_step_id: edge.target_step_id,
            points: Vec::new(),
        })
        .collect();

    let (width, height) = layout_extent(&nodes, &routed, node_width, node_height);
    Layout {
        mode: LayoutMode::Grid,
        direction: config.direction,
        nodes,
        edges: routed,
        layer_count: 0,
        width,
        height,
        fallback_reason: reason,
    }
}

fn usable(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 { value } else { fallback }
}

fn usable_gap(value: f32) -> f32 {
    if value.is_finite() && value >= 0.0 { value } else { FALLBACK_GAP }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_after_configured_columns() {
        let steps: Vec<Step> = (0..5).map(|idx| Step::new(idx + 10, idx)).collect();
        let config = LayoutConfig::default();
        let layout = compute_grid_layout(&steps, &[], &config, None);
        let column_step = config.node_width + config.node_gap;
        let row_step = config.node_height + config.rank_gap;
        assert_eq!(layout.nodes[2].x, 2.0 * column_step + config.node_width / 2.0);
        assert_eq!(layout.nodes[3].x, layout.nodes[0].x);
        assert_eq!(layout.nodes[3].y, layout.nodes[0].y + row_step);
        assert!(layout.is_fallback());
    }

    #[test]
    fn survives_degenerate_spacing() {
        let steps = vec![Step::new(1, 0), Step::new(1, 1)];
        let config = LayoutConfig {
            node_width: f32::NAN,
            node_gap: -5.0,
            grid_columns: 0,
            ..LayoutConfig::default()
        };
        let layout = compute_grid_layout(&steps, &[DependencyEdge::new(1, 1)], &config, None);
        assert_eq!(layout.nodes.len(), 2);
        assert!(layout.nodes.iter().all(|node| node.x.is_finite() && node.y.is_finite()));
        assert!(layout.edges[0].points.is_empty());
    }
}
