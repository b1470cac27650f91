use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PROCESS_FRAME_EVENT: &str = "process_frame";
pub const FRAME_PROCESSED_EVENT: &str = "frame_processed";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub label: Option<String>,
}

/// Reply to one `process_frame` emit.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FrameProcessed {
    #[serde(default)]
    pub features: Option<Vec<Value>>,
    #[serde(default)]
    pub predictions: Option<Prediction>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Error(String),
    Label(String),
    Unexpected,
}

impl FrameProcessed {
    /// Each feature entry flattened to `key: value` lines, in key order.
    /// Arrays are keyed by index; scalar entries contribute nothing.
    pub fn feature_lines(&self) -> Option<Vec<String>> {
        let features = self.features.as_ref()?;
        Some(features.iter().flat_map(entry_lines).collect())
    }

    /// A null label still counts as a prediction and clears the last one.
    pub fn outcome(&self) -> FrameOutcome {
        match (&self.error, &self.predictions) {
            (Some(error), _) if !error.is_empty() => FrameOutcome::Error(error.clone()),
            (_, Some(prediction)) => {
                FrameOutcome::Label(prediction.label.clone().unwrap_or_default())
            }
            _ => FrameOutcome::Unexpected,
        }
    }
}

fn entry_lines(feature: &Value) -> Vec<String> {
    match feature {
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| format!("{key}: {}", display_value(value)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, value)| format!("{index}: {}", display_value(value)))
            .collect(),
        _ => Vec::new(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub sentence: String,
    pub emotion: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateResponse {
    pub non_manual_features: Vec<String>,
    pub rewritten_sentence: String,
}

/// Keeps only bullet lines (`* ...`) and strips the first marker.
pub fn extract_marked_features(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| line.starts_with('*'))
        .map(|line| line.replacen('*', "", 1).trim().to_string())
        .collect()
}
