use pipeline_layout::{Config, Direction, Theme, layout_json};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipelineLayoutOptions {
    theme: Option<String>,
    direction: Option<String>,
    viewport_width: Option<f32>,
    viewport_height: Option<f32>,
    selected_step_id: Option<i64>,
}

fn build_config(options: PipelineLayoutOptions) -> Result<Config, String> {
    let mut config = Config::default();
    if let Some(name) = options.theme.as_deref() {
        config.theme = Theme::by_name(name).ok_or_else(|| format!("unknown theme `{name}`"))?;
    }
    if let Some(token) = options.direction.as_deref() {
        config.layout.direction =
            Direction::from_token(token).ok_or_else(|| format!("unknown direction `{token}`"))?;
    }
    if let Some(width) = options.viewport_width {
        config.render.width = width;
    }
    if let Some(height) = options.viewport_height {
        config.render.height = height;
    }
    config.render.selected = options.selected_step_id;
    Ok(config)
}

/// Lays out a JSON step list for the console and returns the layout dump as JSON.
#[wasm_bindgen]
pub fn layout_pipeline_json(
    steps_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<PipelineLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        PipelineLayoutOptions::default()
    };
    let config = build_config(options).map_err(|error| JsValue::from_str(&error))?;
    let dump = layout_json(steps_json, &config)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    dump.to_json()
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
