use crate::ir::Direction;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 4.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub direction: Direction,
    pub node_width: f32,
    pub node_height: f32,
    /// Gap between consecutive layers, on top of the node extent.
    pub rank_gap: f32,
    /// Gap between neighbours inside a layer, on top of the node extent.
    pub node_gap: f32,
    pub order_passes: usize,
    pub grid_columns: usize,
    pub swimlane: SwimlaneConfig,
    pub viewport: ViewportConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::LeftRight,
            node_width: 200.0,
            node_height: 72.0,
            rank_gap: 80.0,
            node_gap: 40.0,
            order_passes: 4,
            grid_columns: 3,
            swimlane: SwimlaneConfig::default(),
            viewport: ViewportConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Distance between consecutive layer centers.
    pub fn rank_step(&self) -> f32 {
        match self.direction {
            Direction::LeftRight => self.node_width + self.rank_gap,
            Direction::TopDown => self.node_height + self.rank_gap,
        }
    }

    /// Distance between consecutive node centers inside a layer.
    pub fn order_step(&self) -> f32 {
        match self.direction {
            Direction::LeftRight => self.node_height + self.node_gap,
            Direction::TopDown => self.node_width + self.node_gap,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwimlaneConfig {
    pub margin: f32,
}

impl Default for SwimlaneConfig {
    fn default() -> Self {
        Self { margin: 16.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportConfig {
    /// Added to the layout extent on both axes before fitting.
    pub fit_margin: f32,
    pub top_margin: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            fit_margin: 100.0,
            top_margin: 40.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub selected: Option<i64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            selected: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    background: Option<String>,
    line_color: Option<String>,
    selection_color: Option<String>,
    pending_color: Option<String>,
    running_color: Option<String>,
    completed_color: Option<String>,
    failed_color: Option<String>,
    swimlane_palette: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    direction: Option<String>,
    node_width: Option<f32>,
    node_height: Option<f32>,
    rank_gap: Option<f32>,
    node_gap: Option<f32>,
    order_passes: Option<usize>,
    grid_columns: Option<usize>,
    swimlane_margin: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewportConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    fit_margin: Option<f32>,
    top_margin: Option<f32>,
    min_zoom: Option<f32>,
    max_zoom: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    viewport: Option<ViewportConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = theme_name, "unknown theme, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.selection_color {
            config.theme.selection_color = v;
        }
        if let Some(v) = vars.pending_color {
            config.theme.pending_color = v;
        }
        if let Some(v) = vars.running_color {
            config.theme.running_color = v;
        }
        if let Some(v) = vars.completed_color {
            config.theme.completed_color = v;
        }
        if let Some(v) = vars.failed_color {
            config.theme.failed_color = v;
        }
        if let Some(v) = vars.swimlane_palette {
            if !v.is_empty() {
                config.theme.swimlane_palette = v;
            }
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.direction.as_deref() {
            match Direction::from_token(v) {
                Some(direction) => config.layout.direction = direction,
                None => anyhow::bail!("unsupported layout direction `{v}` (expected LR or TD)"),
            }
        }
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v;
        }
        if let Some(v) = layout.rank_gap {
            config.layout.rank_gap = v;
        }
        if let Some(v) = layout.node_gap {
            config.layout.node_gap = v;
        }
        if let Some(v) = layout.order_passes {
            config.layout.order_passes = v;
        }
        if let Some(v) = layout.grid_columns {
            config.layout.grid_columns = v.max(1);
        }
        if let Some(v) = layout.swimlane_margin {
            if !v.is_finite() || v < 0.0 {
                anyhow::bail!("layout swimlaneMargin {v} must be a finite, non-negative size");
            }
            config.layout.swimlane.margin = v;
        }
    }

    if let Some(viewport) = parsed.viewport {
        if let Some(v) = viewport.width {
            config.render.width = v;
        }
        if let Some(v) = viewport.height {
            config.render.height = v;
        }
        if let Some(v) = viewport.fit_margin {
            config.layout.viewport.fit_margin = v;
        }
        if let Some(v) = viewport.top_margin {
            config.layout.viewport.top_margin = v;
        }
        // The zoom range may only be narrowed, never widened past [0.1, 4.0].
        if let Some(v) = viewport.min_zoom {
            config.layout.viewport.min_zoom = v.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        if let Some(v) = viewport.max_zoom {
            config.layout.viewport.max_zoom = v.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        if config.layout.viewport.min_zoom > config.layout.viewport.max_zoom {
            anyhow::bail!(
                "viewport minZoom {} exceeds maxZoom {}",
                config.layout.viewport.min_zoom,
                config.layout.viewport.max_zoom
            );
        }
    }

    Ok(config)
}
