use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::errors::PathError;
use crate::model::LearningPath;

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("json fence pattern")
});

/// Pull the first JSON object out of free-form model output.
///
/// A fenced ```json block wins when it parses. Otherwise the span between the
/// first `{` and the last `}` is tried. Anything else yields `None`.
pub fn extract_structured(raw: &str) -> Option<Value> {
    if let Some(block) = JSON_FENCE.captures(raw).and_then(|caps| caps.get(1)) {
        match parse_object(block.as_str()) {
            Some(value) => return Some(value),
            None => debug!(target: "extract", "fenced block did not parse; trying brace span"),
        }
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    parse_object(&raw[start..=end])
}

fn parse_object(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => None,
        Err(err) => {
            debug!(target: "extract", %err, "candidate JSON rejected");
            None
        }
    }
}

/// Extract and validate a learning path document from raw model output.
pub fn parse_learning_path(raw: &str) -> Result<LearningPath, PathError> {
    let value = extract_structured(raw)
        .ok_or_else(|| PathError::unexpected_structure("no JSON object found in model output"))?;
    if value.get("nodo_raiz").is_none() {
        return Err(PathError::unexpected_structure(
            "document is missing `nodo_raiz`",
        ));
    }
    serde_json::from_value(value).map_err(|err| PathError::unexpected_structure(err.to_string()))
}
