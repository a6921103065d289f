use serde::{Deserialize, Serialize};

use crate::ir::StepStatus;

const DEFAULT_SWIMLANE_PALETTE: [&str; 6] = [
    "rgba(59, 130, 246, 0.08)",
    "rgba(16, 185, 129, 0.08)",
    "rgba(245, 158, 11, 0.08)",
    "rgba(139, 92, 246, 0.08)",
    "rgba(236, 72, 153, 0.08)",
    "rgba(20, 184, 166, 0.08)",
];

const DARK_SWIMLANE_PALETTE: [&str; 6] = [
    "rgba(96, 165, 250, 0.14)",
    "rgba(52, 211, 153, 0.14)",
    "rgba(251, 191, 36, 0.14)",
    "rgba(167, 139, 250, 0.14)",
    "rgba(244, 114, 182, 0.14)",
    "rgba(45, 212, 191, 0.14)",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub background: String,
    pub line_color: String,
    pub selection_color: String,
    pub pending_color: String,
    pub running_color: String,
    pub completed_color: String,
    pub failed_color: String,
    pub swimlane_palette: Vec<String>,
}

impl Theme {
    pub fn console_default() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            line_color: "#94A3B8".to_string(),
            selection_color: "#2563EB".to_string(),
            pending_color: "#CBD5E1".to_string(),
            running_color: "#3B82F6".to_string(),
            completed_color: "#22C55E".to_string(),
            failed_color: "#EF4444".to_string(),
            swimlane_palette: DEFAULT_SWIMLANE_PALETTE
                .iter()
                .map(|value| value.to_string())
                .collect(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#0F172A".to_string(),
            line_color: "#475569".to_string(),
            selection_color: "#60A5FA".to_string(),
            pending_color: "#334155".to_string(),
            running_color: "#2563EB".to_string(),
            completed_color: "#16A34A".to_string(),
            failed_color: "#DC2626".to_string(),
            swimlane_palette: DARK_SWIMLANE_PALETTE
                .iter()
                .map(|value| value.to_string())
                .collect(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" | "light" | "console" => Some(Self::console_default()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }

    pub fn status_color(&self, status: StepStatus) -> &str {
        match status {
            StepStatus::Pending => &self.pending_color,
            StepStatus::Running => &self.running_color,
            StepStatus::Completed => &self.completed_color,
            StepStatus::Failed => &self.failed_color,
        }
    }

    /// Color for the `ordinal`-th swimlane, cycling through the palette.
    pub fn swimlane_color(&self, ordinal: usize) -> String {
        if self.swimlane_palette.is_empty() {
            return DEFAULT_SWIMLANE_PALETTE[ordinal % DEFAULT_SWIMLANE_PALETTE.len()].to_string();
        }
        self.swimlane_palette[ordinal % self.swimlane_palette.len()].clone()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::console_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        let theme = Theme::console_default();
        let len = theme.swimlane_palette.len();
        assert_eq!(theme.swimlane_color(0), theme.swimlane_color(len));
        assert_ne!(theme.swimlane_color(0), theme.swimlane_color(1));
    }

    #[test]
    fn empty_palette_still_yields_colors() {
        let mut theme = Theme::dark();
        theme.swimlane_palette.clear();
        assert_eq!(theme.swimlane_color(0), DEFAULT_SWIMLANE_PALETTE[0]);
    }
}
