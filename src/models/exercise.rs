// src/models/exercise.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A programming exercise produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseItem {
    /// Problem statement.
    pub problem: String,

    /// Difficulty label as written by the model ("Easy", "Medium", ...).
    /// Falls back to the requested difficulty when absent.
    #[serde(default)]
    pub difficulty: Option<String>,

    /// Example input. Models sometimes emit arrays or objects here.
    #[serde(deserialize_with = "text_or_json")]
    pub input: String,

    /// Expected output for the example input.
    #[serde(deserialize_with = "text_or_json")]
    pub output: String,

    /// Reference solution code.
    pub solution: String,

    #[serde(default)]
    pub explanation: Option<String>,
}

/// Accepts a JSON string as-is and renders any other JSON value as text.
fn text_or_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

impl TryFrom<Value> for ExerciseItem {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value).map_err(|e| e.to_string())
    }
}
