use crate::ir::{Step, StepStatus, normalize_group};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid step document: {0}")]
    Syntax(#[from] json5::Error),
    #[error("step document must be an array or an object with a `steps` array")]
    NotAStepList,
    #[error("step record {position}: {reason}")]
    Step { position: usize, reason: StepError },
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("record is not an object")]
    NotAnObject,
    #[error("missing `id`")]
    MissingId,
    #[error("`id` is not an integer: {0}")]
    InvalidId(String),
    #[error("`step_index` is not an integer: {0}")]
    InvalidStepIndex(String),
    #[error("malformed field: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub steps: Vec<Step>,
    /// Records whose `status` was absent or unrecognized and fell back to pending.
    pub defaulted_status: Vec<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Integer(i64),
    Float(f64),
    String(String),
}

impl NumberOrString {
    fn as_i64(&self) -> Option<i64> {
        match self {
            NumberOrString::Integer(val) => Some(*val),
            NumberOrString::Float(val) => {
                // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive.
                let in_range = *val >= i64::MIN as f64 && *val < i64::MAX as f64;
                if val.is_finite() && val.fract() == 0.0 && in_range {
                    Some(*val as i64)
                } else {
                    None
                }
            }
            NumberOrString::String(val) => val.trim().parse::<i64>().ok(),
        }
    }

    fn describe(&self) -> String {
        match self {
            NumberOrString::Integer(val) => val.to_string(),
            NumberOrString::Float(val) => val.to_string(),
            NumberOrString::String(val) => format!("{val:?}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStep {
    id: Option<NumberOrString>,
    #[serde(alias = "stepIndex")]
    step_index: Option<NumberOrString>,
    name: Option<Value>,
    status: Option<Value>,
    #[serde(alias = "dependsOn")]
    depends_on: Option<Value>,
    #[serde(alias = "parallelGroup")]
    parallel_group: Option<Value>,
}

/// Text fields that carry anything but a string are treated as absent.
fn string_field(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

/// Parses a step document: either a bare array of step records or an object
/// carrying a `steps` array. JSON5 syntax (comments, trailing commas) is accepted.
pub fn parse_steps(input: &str) -> Result<ParseOutput, ParseError> {
    let document: Value = json5::from_str(input)?;
    parse_step_value(document)
}

pub fn parse_step_value(document: Value) -> Result<ParseOutput, ParseError> {
    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("steps") {
            Some(Value::Array(records)) => records,
            _ => return Err(ParseError::NotAStepList),
        },
        _ => return Err(ParseError::NotAStepList),
    };

    let mut output = ParseOutput::default();
    output.steps.reserve(records.len());
    for (position, record) in records.into_iter().enumerate() {
        let (step, status_known) = validate_record(record, position)
            .map_err(|reason| ParseError::Step { position, reason })?;
        if !status_known {
            output.defaulted_status.push(position);
        }
        output.steps.push(step);
    }
    Ok(output)
}

fn validate_record(record: Value, position: usize) -> Result<(Step, bool), StepError> {
    if !record.is_object() {
        return Err(StepError::NotAnObject);
    }
    let raw: RawStep = serde_json::from_value(record)?;

    let id_value = raw.id.ok_or(StepError::MissingId)?;
    let id = id_value
        .as_i64()
        .ok_or_else(|| StepError::InvalidId(id_value.describe()))?;

    let step_index = match raw.step_index {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| StepError::InvalidStepIndex(value.describe()))?,
        None => position as i64,
    };

    let (status, status_known) = match raw.status {
        None | Some(Value::Null) => (StepStatus::Pending, false),
        Some(Value::String(token)) => match StepStatus::from_token(&token) {
            Some(status) => (status, true),
            None => {
                tracing::warn!(
                    step_id = id,
                    status = %token,
                    "unknown step status, treating as pending"
                );
                (StepStatus::Pending, false)
            }
        },
        Some(other) => {
            tracing::warn!(
                step_id = id,
                status = %other,
                "non-text step status, treating as pending"
            );
            (StepStatus::Pending, false)
        }
    };

    // Anything but an array means no dependencies; entries that are not
    // integer-like are dropped.
    let depends_on = match raw.depends_on {
        Some(Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| serde_json::from_value::<NumberOrString>(value).ok())
            .filter_map(|value| value.as_i64())
            .collect(),
        _ => Vec::new(),
    };

    let name = string_field(raw.name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("Step {id}"));

    Ok((
        Step {
            id,
            step_index,
            name,
            status,
            depends_on,
            parallel_group: normalize_group(string_field(raw.parallel_group)),
        },
        status_known,
    ))
}
