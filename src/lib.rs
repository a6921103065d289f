#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod pipeline;
pub mod resolve;
pub mod selection;
pub mod swimlane;
pub mod theme;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use ir::{DependencyEdge, Direction, Step, StepId, StepStatus};
pub use layout::{Layout, LayoutMode, LayoutNode, RoutedEdge, compute_layout};
pub use layout_dump::LayoutDump;
pub use parser::{ParseError, parse_steps};
pub use pipeline::{PipelineLayout, compute_pipeline_layout};
pub use resolve::resolve_dependencies;
pub use selection::{dispatch_click, highlight_selection};
pub use swimlane::{Swimlane, compute_swimlanes};
pub use theme::Theme;
pub use viewport::{ViewportTransform, fit_to_view};

/// Parses a step document and lays it out with `config`.
pub fn layout_json(input: &str, config: &Config) -> Result<LayoutDump, ParseError> {
    let parsed = parse_steps(input)?;
    let result = compute_pipeline_layout(
        &parsed.steps,
        &config.render,
        &config.layout,
        &config.theme,
    );
    Ok(LayoutDump::from_layout(
        &result,
        &parsed.steps,
        &config.layout,
        &config.theme,
    ))
}
