use serde::Deserialize;

use super::ExtractionError;
use crate::models::Severity;

/// Top-level JSON document the extraction service is asked to return.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExtraction {
    #[serde(default)]
    property_address: String,
    #[serde(default)]
    signals: Vec<serde_json::Value>,
}

/// One signal as it appears on the wire. `category` and the source document
/// are stamped by the adapter afterwards, so they are not part of the wire
/// schema.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSignal {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: String,
    pub severity: Severity,
    #[serde(default)]
    pub recommended_action: String,
    #[serde(default)]
    pub client_explanation: String,
}

/// Parse the service response into the declared schema. Tolerates a body
/// wrapped in Markdown code fences; fails as `MalformedResponse` when the
/// body is not the declared JSON object.
pub fn parse_extraction_response(
    response: &str,
) -> Result<(String, Vec<RawSignal>), ExtractionError> {
    let body = strip_code_fences(response);
    let raw: RawExtraction = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;
    let signals = parse_signals_lenient(&raw.signals);
    Ok((raw.property_address.trim().to_string(), signals))
}

/// Strip wrapping Markdown code fences from a model response, tolerating
/// ```json fenced, bare ``` fenced, and unfenced raw JSON bodies.
pub fn strip_code_fences(response: &str) -> &str {
    if let Some(start) = response.find("```json") {
        let after = &response[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
        return after.trim();
    }
    if let Some(start) = response.find("```") {
        let after = &response[start + 3..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
        return after.trim();
    }
    response.trim()
}

/// Parse the signal array leniently — a malformed item is logged and
/// skipped rather than failing the whole document.
fn parse_signals_lenient(items: &[serde_json::Value]) -> Vec<RawSignal> {
    items
        .iter()
        .filter_map(|v| match serde_json::from_value::<RawSignal>(v.clone()) {
            Ok(signal) => Some(signal),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed signal in extraction response");
                None
            }
        })
        .collect()
}
