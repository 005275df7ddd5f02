//! Wire shapes for the text-generation inference endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::STORY_PROMPT_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub inputs: String,
}

/// Error payload the endpoint returns for auth failures, rate limits and
/// cold models.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InferenceErrorBody {
    pub error: String,
    #[serde(default)]
    pub estimated_time: Option<f64>,
}

pub fn wrap_prompt(prompt: &str) -> String {
    format!("{STORY_PROMPT_PREFIX}{prompt}")
}

/// Pulls `[0].generated_text` out of a response body. Empty strings count as
/// absent.
pub fn extract_generated_text(body: &Value) -> Option<String> {
    body.as_array()?
        .first()?
        .get("generated_text")?
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

pub fn error_message(body: &Value) -> Option<String> {
    serde_json::from_value::<InferenceErrorBody>(body.clone())
        .ok()
        .map(|body| body.error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wraps_prompt_with_instruction() {
        assert_eq!(
            wrap_prompt("a robot in space"),
            "Write a short story based on this idea: a robot in space"
        );
    }

    #[test]
    fn request_serializes_as_inputs_object() {
        let request = InferenceRequest {
            inputs: wrap_prompt("cats"),
        };
        let body = serde_json::to_value(request).expect("json");
        assert_eq!(
            body,
            json!({ "inputs": "Write a short story based on this idea: cats" })
        );
    }

    #[test]
    fn extracts_first_generated_text() {
        let body = json!([{ "generated_text": "Once upon a time..." }, { "generated_text": "x" }]);
        assert_eq!(
            extract_generated_text(&body).as_deref(),
            Some("Once upon a time...")
        );
    }

    #[test]
    fn rejects_shapes_without_generated_text() {
        for body in [
            json!([]),
            json!({}),
            json!({ "error": "Model gpt2 is currently loading", "estimated_time": 20.0 }),
            json!([{ "summary_text": "nope" }]),
            json!([{ "generated_text": 42 }]),
            json!([{ "generated_text": "" }]),
            json!("plain string"),
        ] {
            assert_eq!(extract_generated_text(&body), None, "body: {body}");
        }
    }

    #[test]
    fn reads_error_message_from_error_payload() {
        let body = json!({ "error": "Rate limit reached" });
        assert_eq!(error_message(&body).as_deref(), Some("Rate limit reached"));
        assert_eq!(error_message(&json!([])), None);
    }
}
