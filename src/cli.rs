use crate::config::load_config;
use crate::ir::Direction;
use crate::layout_dump::write_layout_dump;
use crate::theme::Theme;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pipeline-layout",
    version,
    about = "Lay out pipeline step dependency graphs as JSON"
)]
pub struct Args {
    /// Input step document (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file (layout, viewport and themeVariables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Viewport width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Viewport height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Step id to mark as selected
    #[arg(short = 's', long = "selected", allow_negative_numbers = true)]
    pub selected: Option<i64>,

    /// Layer direction
    #[arg(short = 'd', long = "direction", value_enum)]
    pub direction: Option<DirectionArg>,

    /// Named theme (default, dark)
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DirectionArg {
    Lr,
    Td,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Lr => Direction::LeftRight,
            DirectionArg::Td => Direction::TopDown,
        }
    }
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pipeline_layout=warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("loading config {:?}", args.config))?;
    if let Some(name) = args.theme.as_deref() {
        config.theme =
            Theme::by_name(name).ok_or_else(|| anyhow::anyhow!("unknown theme `{name}`"))?;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(direction) = args.direction {
        config.layout.direction = direction.into();
    }
    config.render.selected = args.selected;

    let input = read_input(args.input.as_deref())?;
    let dump = crate::layout_json(&input, &config)?;
    if let Some(reason) = dump.fallback_reason.as_deref() {
        tracing::info!(reason, "pipeline drawn as grid");
    }
    write_layout_dump(args.output.as_deref(), &dump)?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading steps from {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
