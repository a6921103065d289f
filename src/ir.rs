use serde::{Deserialize, Serialize};

pub type StepId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "TD", alias = "TB")]
    TopDown,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "TD" | "TB" => Some(Self::TopDown),
            "LR" => Some(Self::LeftRight),
            _ => None,
        }
    }

    /// Token used everywhere the direction is written out.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftRight => "LR",
            Self::TopDown => "TD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// A validated pipeline step. Produced once at the input boundary; the layout
/// core only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: StepId,
    pub step_index: i64,
    pub name: String,
    pub status: StepStatus,
    pub depends_on: Vec<i64>,
    pub parallel_group: Option<String>,
}

impl Step {
    pub fn new(id: StepId, step_index: i64) -> Self {
        Self {
            id,
            step_index,
            name: format!("Step {id}"),
            status: StepStatus::Pending,
            depends_on: Vec::new(),
            parallel_group: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    pub fn depending_on(mut self, refs: impl IntoIterator<Item = i64>) -> Self {
        self.depends_on = refs.into_iter().collect();
        self
    }

    /// Blank labels collapse to "no group".
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        self.parallel_group = normalize_group(Some(group));
        self
    }

    pub fn group(&self) -> Option<&str> {
        self.parallel_group.as_deref()
    }
}

pub(crate) fn normalize_group(group: Option<String>) -> Option<String> {
    group
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
}

/// Resolved precedence relation: `source` must finish before `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub source_step_id: StepId,
    pub target_step_id: StepId,
}

impl DependencyEdge {
    pub fn new(source_step_id: StepId, target_step_id: StepId) -> Self {
        Self {
            source_step_id,
            target_step_id,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source_step_id == self.target_step_id
    }
}
