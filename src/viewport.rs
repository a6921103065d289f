use serde::Serialize;

use crate::config::{MAX_ZOOM, MIN_ZOOM, ViewportConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

/// Clamps a requested zoom to the configured range, itself bounded by
/// `[MIN_ZOOM, MAX_ZOOM]`. Non-finite requests resolve to 1.0.
pub fn clamp_scale(scale: f32, config: &ViewportConfig) -> f32 {
    let finite_or = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
    let min = finite_or(config.min_zoom, MIN_ZOOM).clamp(MIN_ZOOM, MAX_ZOOM);
    let max = finite_or(config.max_zoom, MAX_ZOOM).clamp(min, MAX_ZOOM);
    let scale = if scale.is_finite() { scale } else { 1.0 };
    scale.clamp(min, max)
}

/// Initial transform fitting a `layout_width` x `layout_height` drawing into
/// the viewport: never enlarges past 1.0, centers horizontally and sits
/// `top_margin` below the top edge.
pub fn fit_to_view(
    layout_width: f32,
    layout_height: f32,
    viewport_width: f32,
    viewport_height: f32,
    config: &ViewportConfig,
) -> ViewportTransform {
    let usable = |value: f32| value.is_finite() && value > 0.0;
    if !usable(viewport_width) || !usable(viewport_height) {
        return ViewportTransform {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: config.top_margin,
        };
    }
    let layout_width = if layout_width.is_finite() { layout_width.max(0.0) } else { 0.0 };
    let layout_height = if layout_height.is_finite() { layout_height.max(0.0) } else { 0.0 };

    let fit_x = viewport_width / (layout_width + config.fit_margin);
    let fit_y = viewport_height / (layout_height + config.fit_margin);
    let scale = clamp_scale(fit_x.min(fit_y).min(1.0), config);
    ViewportTransform {
        scale,
        translate_x: (viewport_width - layout_width * scale) / 2.0,
        translate_y: config.top_margin,
    }
}

impl ViewportTransform {
    pub fn with_scale(self, scale: f32, config: &ViewportConfig) -> Self {
        Self {
            scale: clamp_scale(scale, config),
            ..self
        }
    }

    /// Multiplies the scale by `factor`, keeping the screen point `focus`
    /// over the same layout point.
    pub fn zoom_at(self, factor: f32, focus: (f32, f32), config: &ViewportConfig) -> Self {
        let scale = clamp_scale(self.scale * factor, config);
        if self.scale <= 0.0 || !self.scale.is_finite() {
            return Self { scale, ..self };
        }
        let ratio = scale / self.scale;
        Self {
            scale,
            translate_x: focus.0 - (focus.0 - self.translate_x) * ratio,
            translate_y: focus.1 - (focus.1 - self.translate_y) * ratio,
        }
    }

    /// Panning is unbounded.
    pub fn pan(self, dx: f32, dy: f32) -> Self {
        Self {
            translate_x: self.translate_x + dx,
            translate_y: self.translate_y + dy,
            ..self
        }
    }

    pub fn to_screen(&self, point: (f32, f32)) -> (f32, f32) {
        (
            point.0 * self.scale + self.translate_x,
            point.1 * self.scale + self.translate_y,
        )
    }

    pub fn to_layout(&self, point: (f32, f32)) -> (f32, f32) {
        (
            (point.0 - self.translate_x) / self.scale,
            (point.1 - self.translate_y) / self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_requests_are_clamped() {
        let config = ViewportConfig::default();
        let view = ViewportTransform::default();
        assert_eq!(view.with_scale(100.0, &config).scale, 4.0);
        assert_eq!(view.with_scale(0.0001, &config).scale, 0.1);
        assert_eq!(view.with_scale(f32::NAN, &config).scale, 1.0);
        assert_eq!(view.zoom_at(1000.0, (10.0, 10.0), &config).scale, 4.0);
    }

    #[test]
    fn narrowed_range_is_respected() {
        let config = ViewportConfig {
            min_zoom: 0.5,
            max_zoom: 2.0,
            ..ViewportConfig::default()
        };
        assert_eq!(clamp_scale(3.0, &config), 2.0);
        assert_eq!(clamp_scale(0.2, &config), 0.5);
    }

    #[test]
    fn small_layout_is_not_enlarged() {
        let config = ViewportConfig::default();
        let view = fit_to_view(200.0, 100.0, 1200.0, 800.0, &config);
        assert_eq!(view.scale, 1.0);
        assert_eq!(view.translate_x, 500.0);
        assert_eq!(view.translate_y, config.top_margin);
    }

    #[test]
    fn large_layout_shrinks_to_fit() {
        let config = ViewportConfig::default();
        let view = fit_to_view(1900.0, 300.0, 1000.0, 800.0, &config);
        assert_eq!(view.scale, 0.5);
        assert_eq!(view.translate_x, (1000.0 - 1900.0 * 0.5) / 2.0);
    }

    #[test]
    fn huge_layout_stops_at_min_zoom() {
        let config = ViewportConfig::default();
        let view = fit_to_view(1.0e6, 1.0e6, 800.0, 600.0, &config);
        assert_eq!(view.scale, MIN_ZOOM);
    }

    #[test]
    fn zero_viewport_defaults_to_unit_scale() {
        let config = ViewportConfig::default();
        let view = fit_to_view(500.0, 500.0, 0.0, 0.0, &config);
        assert_eq!(view.scale, 1.0);
    }

    #[test]
    fn zoom_keeps_focus_fixed() {
        let config = ViewportConfig::default();
        let view = ViewportTransform {
            scale: 1.0,
            translate_x: 20.0,
            translate_y: 40.0,
        };
        let focus = (220.0, 140.0);
        let anchor = view.to_layout(focus);
        let zoomed = view.zoom_at(2.0, focus, &config);
        let moved = zoomed.to_screen(anchor);
        assert!((moved.0 - focus.0).abs() < 1e-3);
        assert!((moved.1 - focus.1).abs() < 1e-3);
    }

    #[test]
    fn pan_is_unbounded() {
        let view = ViewportTransform::default().pan(-1.0e7, 3.0e7);
        assert_eq!(view.translate_x, -1.0e7);
        assert_eq!(view.translate_y, 3.0e7);
    }
}
