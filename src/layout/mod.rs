mod grid;
mod ranking;
mod routing;
pub(crate) mod types;

pub use ranking::{LayeringStrategy, MedianLayering, Stratification, StratifyFailure};
pub use routing::path_bend_count;
pub use types::*;

use grid::compute_grid_layout;
use ranking::split_long_edges;
use routing::route_chain;

use std::collections::HashMap;

use thiserror::Error;

use crate::config::LayoutConfig;
use crate::ir::{DependencyEdge, Direction, Step, StepId};

/// Reasons the layered path gives up. None of these reach the caller; they
/// only select the grid layout and end up in `Layout::fallback_reason`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Stratify(#[from] StratifyFailure),
    #[error("layer assignment returned {got} ranks for {expected} steps")]
    RankCount { expected: usize, got: usize },
    #[error("rank {rank} is out of range for {steps} steps")]
    RankOutOfRange { rank: usize, steps: usize },
    #[error("edge {from} -> {to} does not descend through the layers")]
    RankViolation { from: StepId, to: StepId },
    #[error("crossing reduction lost or duplicated vertex {0}")]
    OrderingMismatch(usize),
    #[error("crossing reduction returned {got} layers, expected {expected}")]
    LayerCount { expected: usize, got: usize },
    #[error("crossing reduction moved vertex {vertex} from layer {from} to layer {to}")]
    LayerChanged {
        vertex: usize,
        from: usize,
        to: usize,
    },
    #[error("spacing {name} = {value} is not a usable finite size")]
    InvalidSpacing { name: &'static str, value: f32 },
    #[error("non-finite coordinate for step {0}")]
    NonFiniteCoordinate(StepId),
}

/// Lays out `steps` with the default median layering.
pub fn compute_layout(steps: &[Step], edges: &[DependencyEdge], config: &LayoutConfig) -> Layout {
    let strategy = MedianLayering::new(config.order_passes);
    compute_layout_with(&strategy, steps, edges, config)
}

/// Lays out `steps` with a caller-chosen layering strategy. Never fails: any
/// problem on the layered path yields the grid layout instead.
pub fn compute_layout_with<S: LayeringStrategy + ?Sized>(
    strategy: &S,
    steps: &[Step],
    edges: &[DependencyEdge],
    config: &LayoutConfig,
) -> Layout {
    match layered_layout(strategy, steps, edges, config) {
        Ok(layout) => {
            tracing::debug!(
                steps = steps.len(),
                layers = layout.layer_count,
                "layered pipeline layout"
            );
            layout
        }
        Err(err) => {
            tracing::debug!(steps = steps.len(), reason = %err, "falling back to grid layout");
            compute_grid_layout(steps, edges, config, Some(err.to_string()))
        }
    }
}

fn layered_layout<S: LayeringStrategy + ?Sized>(
    strategy: &S,
    steps: &[Step],
    edges: &[DependencyEdge],
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    check_spacing(config)?;

    let ids: Vec<StepId> = steps.iter().map(|step| step.id).collect();
    let ranks = match strategy.stratify(&ids, edges) {
        Stratification::Stratified(ranks) => ranks,
        Stratification::Fallback(failure) => return Err(failure.into()),
    };
    if ranks.len() != steps.len() {
        return Err(LayoutError::RankCount {
            expected: steps.len(),
            got: ranks.len(),
        });
    }
    if steps.is_empty() {
        return Ok(Layout::empty(config.direction));
    }
    if let Some(&rank) = ranks.iter().find(|rank| **rank >= steps.len()) {
        return Err(LayoutError::RankOutOfRange {
            rank,
            steps: steps.len(),
        });
    }

    // Stratification already rejected duplicate ids, so this map is one-to-one.
    let index_of: HashMap<StepId, usize> =
        ids.iter().enumerate().map(|(idx, id)| (*id, idx)).collect();
    let mut index_edges = Vec::with_capacity(edges.len());
    for edge in edges {
        match (
            index_of.get(&edge.source_step_id),
            index_of.get(&edge.target_step_id),
        ) {
            (Some(&from), Some(&to)) => index_edges.push((from, to)),
            (None, _) => return Err(StratifyFailure::UnknownStep(edge.source_step_id).into()),
            (_, None) => return Err(StratifyFailure::UnknownStep(edge.target_step_id).into()),
        }
    }

    let proper = split_long_edges(&ranks, &index_edges).ok_or_else(|| {
        let violation = edges
            .iter()
            .zip(&index_edges)
            .find(|(_, (from, to))| ranks[*to] <= ranks[*from])
            .map(|(edge, _)| *edge)
            .unwrap_or_else(|| DependencyEdge::new(0, 0));
        LayoutError::RankViolation {
            from: violation.source_step_id,
            to: violation.target_step_id,
        }
    })?;

    let layers = strategy.minimize_crossings(proper.layers.clone(), &proper.links);
    check_ordering(&layers, &proper.layers, proper.vertex_count)?;

    let coords = assign_coordinates(&layers, proper.vertex_count, config);
    let nodes: Vec<LayoutNode> = steps
        .iter()
        .zip(&coords)
        .map(|(step, (x, y))| LayoutNode {
            step_id: step.id,
            x: *x,
            y: *y,
        })
        .collect();
    if let Some(node) = nodes.iter().find(|node| !node.x.is_finite() || !node.y.is_finite()) {
        return Err(LayoutError::NonFiniteCoordinate(node.step_id));
    }

    let routed: Vec<RoutedEdge> = edges
        .iter()
        .zip(&proper.chains)
        .map(|(edge, chain)| RoutedEdge {
            source_step_id: edge.source_step_id,
            target_step_id: edge.target_step_id,
            points: route_chain(chain, &coords, config),
        })
        .collect();

    let (width, height) = layout_extent(&nodes, &routed, config.node_width, config.node_height);
    Ok(Layout {
        mode: LayoutMode::Layered,
        direction: config.direction,
        nodes,
        edges: routed,
        layer_count: layers.len(),
        width,
        height,
        fallback_reason: None,
    })
}

fn check_spacing(config: &LayoutConfig) -> Result<(), LayoutError> {
    let extents = [
        ("node_width", config.node_width),
        ("node_height", config.node_height),
    ];
    for (name, value) in extents {
        if !value.is_finite() || value <= 0.0 {
            return Err(LayoutError::InvalidSpacing { name, value });
        }
    }
    let gaps = [("rank_gap", config.rank_gap), ("node_gap", config.node_gap)];
    for (name, value) in gaps {
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::InvalidSpacing { name, value });
        }
    }
    Ok(())
}

/// Ordering may only permute vertices within their own layer.
fn check_ordering(
    layers: &[Vec<usize>],
    original: &[Vec<usize>],
    vertex_count: usize,
) -> Result<(), LayoutError> {
    if layers.len() != original.len() {
        return Err(LayoutError::LayerCount {
            expected: original.len(),
            got: layers.len(),
        });
    }
    let mut layer_of = vec![usize::MAX; vertex_count];
    for (rank, layer) in original.iter().enumerate() {
        for vertex in layer {
            if let Some(slot) = layer_of.get_mut(*vertex) {
                *slot = rank;
            }
        }
    }

    let mut seen = vec![false; vertex_count];
    for (rank, layer) in layers.iter().enumerate() {
        for vertex in layer {
            match seen.get_mut(*vertex) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(LayoutError::OrderingMismatch(*vertex)),
            }
            if layer_of[*vertex] != rank {
                return Err(LayoutError::LayerChanged {
                    vertex: *vertex,
                    from: layer_of[*vertex],
                    to: rank,
                });
            }
        }
    }
    if let Some(missing) = seen.iter().position(|present| !present) {
        return Err(LayoutError::OrderingMismatch(missing));
    }
    Ok(())
}

/// Center per vertex. Layers advance along the main axis; within a layer,
/// vertices advance along the cross axis and the layer is centered against the
/// longest one.
fn assign_coordinates(
    layers: &[Vec<usize>],
    vertex_count: usize,
    config: &LayoutConfig,
) -> Vec<(f32, f32)> {
    let rank_step = config.rank_step();
    let order_step = config.order_step();
    let widest = layers.iter().map(Vec::len).max().unwrap_or(0);
    let (half_main, half_cross) = match config.direction {
        Direction::LeftRight => (config.node_width / 2.0, config.node_height / 2.0),
        Direction::TopDown => (config.node_height / 2.0, config.node_width / 2.0),
    };

    let mut coords = vec![(0.0f32, 0.0f32); vertex_count];
    for (rank, layer) in layers.iter().enumerate() {
        let main = rank as f32 * rank_step + half_main;
        let offset = (widest - layer.len()) as f32 * order_step / 2.0;
        for (pos, vertex) in layer.iter().enumerate() {
            let cross = offset + pos as f32 * order_step + half_cross;
            coords[*vertex] = match config.direction {
                Direction::LeftRight => (main, cross),
                Direction::TopDown => (cross, main),
            };
        }
    }
    coords
}
