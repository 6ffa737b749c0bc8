//! Food analysis result parsing and shape validation
//!
//! The model's reply is expected to be JSON of the shape
//! `{ "items": [{ "name": string, "estimatedGrams": number|null }, ...] }`.
//! Validation fails closed: any element violating the shape rejects the whole
//! result rather than filtering it out.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

use crate::extract::strip_code_fence;

/// How many characters of raw model output to include when parsing fails
const RAW_SNIPPET_CHARS: usize = 500;

/// Instruction sent with every analysis request. The reply is still treated
/// defensively since nothing forces the model to honor it.
pub const FOOD_ANALYSIS_PROMPT: &str = "Identify every distinct food item visible in this image. \
Respond with strictly valid JSON only, no prose and no markdown fences, in the exact shape \
{\"items\":[{\"name\":\"...\",\"estimatedGrams\":123}]}. For each item give its common name and \
your best estimate of its mass in grams as a non-negative number. Use null for estimatedGrams \
when a reasonable estimate is not feasible.";

/// Errors turning model output into an analysis result
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Model output is not valid JSON: {message}. Raw output begins: {snippet}")]
    NotJson { message: String, snippet: String },

    #[error("Model output failed shape validation: {0}")]
    InvalidShape(String),
}

/// One recognized food item: a name and an estimated mass in grams, or null
/// when the model could not estimate.
///
/// Grams are kept as `serde_json::Number` so the value round-trips exactly as
/// the model produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    #[serde(rename = "estimatedGrams")]
    pub estimated_grams: Option<Number>,
}

/// Ordered list of recognized food items, returned to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub items: Vec<FoodItem>,
}

impl AnalysisResult {
    /// Parse and validate raw model output: strip a surrounding code fence,
    /// parse as JSON, then walk the expected shape.
    pub fn from_model_output(raw: &str) -> Result<Self, AnalysisError> {
        let text = strip_code_fence(raw);

        let value: Value = serde_json::from_str(&text).map_err(|e| AnalysisError::NotJson {
            message: e.to_string(),
            snippet: raw.chars().take(RAW_SNIPPET_CHARS).collect(),
        })?;

        Self::from_value(&value)
    }

    /// Validate the parsed JSON value against the expected shape.
    fn from_value(value: &Value) -> Result<Self, AnalysisError> {
        let object = value
            .as_object()
            .ok_or_else(|| AnalysisError::InvalidShape("response is not a JSON object".into()))?;

        let items = object
            .get("items")
            .ok_or_else(|| AnalysisError::InvalidShape("missing 'items' array".into()))?
            .as_array()
            .ok_or_else(|| AnalysisError::InvalidShape("'items' is not an array".into()))?;

        let mut parsed = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            parsed.push(Self::parse_item(idx, item)?);
        }

        Ok(AnalysisResult { items: parsed })
    }

    fn parse_item(idx: usize, item: &Value) -> Result<FoodItem, AnalysisError> {
        let object = item.as_object().ok_or_else(|| {
            AnalysisError::InvalidShape(format!("items[{}] is not an object", idx))
        })?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AnalysisError::InvalidShape(format!("items[{}].name must be a string", idx))
            })?;
        if name.is_empty() {
            return Err(AnalysisError::InvalidShape(format!(
                "items[{}].name must be non-empty",
                idx
            )));
        }

        let estimated_grams = match object.get("estimatedGrams") {
            Some(Value::Null) => None,
            Some(Value::Number(n)) => {
                if n.as_f64().unwrap_or(-1.0) < 0.0 {
                    return Err(AnalysisError::InvalidShape(format!(
                        "items[{}].estimatedGrams must be >= 0",
                        idx
                    )));
                }
                Some(n.clone())
            }
            Some(_) => {
                return Err(AnalysisError::InvalidShape(format!(
                    "items[{}].estimatedGrams must be a number or null",
                    idx
                )))
            }
            None => {
                return Err(AnalysisError::InvalidShape(format!(
                    "items[{}] is missing 'estimatedGrams'",
                    idx
                )))
            }
        };

        Ok(FoodItem {
            name: name.to_string(),
            estimated_grams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_reply() {
        let result =
            AnalysisResult::from_model_output(r#"{"items":[{"name":"apple","estimatedGrams":150}]}"#)
                .unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].name, "apple");
        assert_eq!(
            result.items[0].estimated_grams,
            Some(Number::from(150u32))
        );
    }

    #[test]
    fn test_fenced_reply() {
        let raw = "```json\n{\"items\":[{\"name\":\"apple\",\"estimatedGrams\":150}]}\n```";
        let result = AnalysisResult::from_model_output(raw).unwrap();
        assert_eq!(result.items[0].name, "apple");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"items":[{"name":"apple","estimatedGrams":150}]})
        );
    }

    #[test]
    fn test_null_grams_allowed() {
        let result =
            AnalysisResult::from_model_output(r#"{"items":[{"name":"garnish","estimatedGrams":null}]}"#)
                .unwrap();
        assert_eq!(result.items[0].estimated_grams, None);
    }

    #[test]
    fn test_string_grams_rejected_not_coerced() {
        let err =
            AnalysisResult::from_model_output(r#"{"items":[{"name":"apple","estimatedGrams":"150"}]}"#)
                .unwrap_err();
        match err {
            AnalysisError::InvalidShape(msg) => assert!(msg.contains("estimatedGrams")),
            other => panic!("expected InvalidShape, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_grams_rejected() {
        let err =
            AnalysisResult::from_model_output(r#"{"items":[{"name":"apple","estimatedGrams":-1}]}"#)
                .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidShape(_)));
    }

    #[test]
    fn test_missing_grams_rejected() {
        let err = AnalysisResult::from_model_output(r#"{"items":[{"name":"apple"}]}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidShape(_)));
    }

    #[test]
    fn test_one_bad_item_rejects_whole_result() {
        let raw = r#"{"items":[{"name":"apple","estimatedGrams":150},{"name":42,"estimatedGrams":10}]}"#;
        let err = AnalysisResult::from_model_output(raw).unwrap_err();
        match err {
            AnalysisError::InvalidShape(msg) => assert!(msg.contains("items[1]")),
            other => panic!("expected InvalidShape, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_items_rejected() {
        let err = AnalysisResult::from_model_output(r#"{"foods":[]}"#).unwrap_err();
        match err {
            AnalysisError::InvalidShape(msg) => assert!(msg.contains("items")),
            other => panic!("expected InvalidShape, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_rejected() {
        let err = AnalysisResult::from_model_output(r#"[1,2,3]"#).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidShape(_)));
    }

    #[test]
    fn test_unparseable_reply_carries_raw_snippet() {
        let raw = "I see a delicious plate of pasta with tomato sauce.";
        let err = AnalysisResult::from_model_output(raw).unwrap_err();
        match err {
            AnalysisError::NotJson { snippet, .. } => {
                assert!(snippet.starts_with("I see a delicious"));
            }
            other => panic!("expected NotJson, got {:?}", other),
        }
    }

    #[test]
    fn test_raw_snippet_capped_at_500_chars() {
        let raw = "x".repeat(2000);
        let err = AnalysisResult::from_model_output(&raw).unwrap_err();
        match err {
            AnalysisError::NotJson { snippet, .. } => assert_eq!(snippet.chars().count(), 500),
            other => panic!("expected NotJson, got {:?}", other),
        }
    }

    #[test]
    fn test_serialization_round_trip_lossless() {
        let raw = r#"{"items":[{"name":"rice","estimatedGrams":180},{"name":"herbs","estimatedGrams":null},{"name":"sauce","estimatedGrams":12.5}]}"#;
        let result = AnalysisResult::from_model_output(raw).unwrap();

        let serialized = serde_json::to_string(&result).unwrap();
        let reparsed: AnalysisResult = serde_json::from_str(&serialized).unwrap();
        assert_eq!(result, reparsed);

        let value: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(value["items"][0]["estimatedGrams"], serde_json::json!(180));
        assert_eq!(value["items"][1]["estimatedGrams"], Value::Null);
        assert_eq!(value["items"][2]["estimatedGrams"], serde_json::json!(12.5));
    }

    #[test]
    fn test_prompt_demands_strict_json() {
        assert!(FOOD_ANALYSIS_PROMPT.contains("JSON"));
        assert!(FOOD_ANALYSIS_PROMPT.contains("estimatedGrams"));
    }
}
