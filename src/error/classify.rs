//! AWS HTTP error classification.
//!
//! AWS JSON services return error bodies shaped like
//! `{ "message": "...", "__type": "..." }` (some use `Message`). The provider
//! message is kept verbatim and the parsed body is attached as details.

use super::types::GatewayError;

fn extract_message(json: &serde_json::Value) -> Option<String> {
    json.get("message")
        .and_then(|v| v.as_str())
        .or_else(|| json.get("Message").and_then(|v| v.as_str()))
        .or_else(|| json.get("errorMessage").and_then(|v| v.as_str()))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_error_type(json: &serde_json::Value) -> Option<String> {
    json.get("__type")
        .and_then(|v| v.as_str())
        // `__type` may be namespaced: "com.amazonaws.rekognition#InvalidImageFormatException"
        .map(|s| s.rsplit('#').next().unwrap_or(s).trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Turn a non-success response into `GatewayError::ApiError`.
pub fn classify_http_error(status: u16, body: &[u8]) -> GatewayError {
    let text = String::from_utf8_lossy(body);
    let json = serde_json::from_slice::<serde_json::Value>(body).ok();

    let message = json
        .as_ref()
        .and_then(extract_message)
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    let message = match json.as_ref().and_then(extract_error_type) {
        Some(kind) => format!("{kind}: {message}"),
        None => message,
    };

    match json {
        Some(details) => GatewayError::api_error_with_details(status, message, details),
        None => GatewayError::api_error(status, message),
    }
}
