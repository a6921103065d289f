use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::{DependencyEdge, Step, StepId};
use crate::layout::{Layout, compute_layout};
use crate::resolve::resolve_dependencies;
use crate::selection::highlight_selection;
use crate::swimlane::{Swimlane, compute_swimlanes};
use crate::theme::Theme;
use crate::viewport::{ViewportTransform, fit_to_view};

/// Everything the rendering layer needs for one snapshot of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineLayout {
    pub dependencies: Vec<DependencyEdge>,
    pub layout: Layout,
    pub swimlanes: Vec<Swimlane>,
    pub viewport: ViewportTransform,
    pub selection: BTreeMap<StepId, bool>,
}

/// Resolves dependencies, lays out the graph, builds swimlanes, fits the
/// viewport and marks the selection. Total over all inputs.
pub fn compute_pipeline_layout(
    steps: &[Step],
    render: &RenderConfig,
    config: &LayoutConfig,
    theme: &Theme,
) -> PipelineLayout {
    let dependencies = resolve_dependencies(steps);
    let layout = compute_layout(steps, &dependencies, config);
    let swimlanes = compute_swimlanes(&layout.nodes, steps, config, theme);
    let viewport = fit_to_view(
        layout.width,
        layout.height,
        render.width,
        render.height,
        &config.viewport,
    );
    let selection = highlight_selection(&layout.nodes, render.selected);
    PipelineLayout {
        dependencies,
        layout,
        swimlanes,
        viewport,
        selection,
    }
}

impl PipelineLayout {
    /// Moves the highlight without touching positions.
    pub fn reselect(&mut self, selected: Option<StepId>) {
        self.selection = highlight_selection(&self.layout.nodes, selected);
    }

    /// Refits the initial transform for a resized container. Layout is reused.
    pub fn refit(&mut self, viewport_width: f32, viewport_height: f32, config: &LayoutConfig) {
        self.viewport = fit_to_view(
            self.layout.width,
            self.layout.height,
            viewport_width,
            viewport_height,
            &config.viewport,
        );
    }

    pub fn selected_step(&self) -> Option<StepId> {
        self.selection
            .iter()
            .find_map(|(step_id, selected)| selected.then_some(*step_id))
    }
}
