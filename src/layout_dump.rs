use crate::config::LayoutConfig;
use crate::ir::Step;
use crate::layout::path_bend_count;
use crate::pipeline::PipelineLayout;
use crate::swimlane::Swimlane;
use crate::theme::Theme;
use crate::viewport::ViewportTransform;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub mode: String,
    pub direction: String,
    pub width: f32,
    pub height: f32,
    pub layer_count: usize,
    pub fallback_reason: Option<String>,
    pub viewport: ViewportTransform,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub swimlanes: Vec<Swimlane>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub step_id: i64,
    pub name: String,
    pub status: String,
    pub parallel_group: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub source_step_id: i64,
    pub target_step_id: i64,
    pub points: Vec<[f32; 2]>,
    pub bends: usize,
}

impl LayoutDump {
    pub fn from_layout(
        result: &PipelineLayout,
        steps: &[Step],
        config: &LayoutConfig,
        theme: &Theme,
    ) -> Self {
        let layout = &result.layout;
        let nodes = layout
            .nodes
            .iter()
            .zip(steps)
            .map(|(node, step)| NodeDump {
                step_id: node.step_id,
                name: step.name.clone(),
                status: step.status.as_str().to_string(),
                parallel_group: step.parallel_group.clone(),
                x: node.x,
                y: node.y,
                width: config.node_width,
                height: config.node_height,
                color: theme.status_color(step.status).to_string(),
                selected: result.selection.get(&node.step_id).copied().unwrap_or(false),
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                source_step_id: edge.source_step_id,
                target_step_id: edge.target_step_id,
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
                bends: path_bend_count(&edge.points),
            })
            .collect();

        LayoutDump {
            mode: format!("{:?}", layout.mode).to_lowercase(),
            direction: layout.direction.as_str().to_string(),
            width: layout.width,
            height: layout.height,
            layer_count: layout.layer_count,
            fallback_reason: layout.fallback_reason.clone(),
            viewport: result.viewport,
            nodes,
            edges,
            swimlanes: result.swimlanes.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Writes the dump as pretty JSON to `path`, or stdout when `path` is `None`.
pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, dump)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}
