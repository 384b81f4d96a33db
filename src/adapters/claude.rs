//! Anthropic Claude text completions.
//!
//! The inbound payload carries the provider body under `body`, either as a JSON
//! string or as an object; when `body` is absent the payload itself is the body.
//! The `prompt` field is wrapped in the Human/Assistant dialogue template before
//! the body is re-serialized. The answer is the top-level `completion` field.

use super::{ModelAdapter, parse_provider_json};
use crate::defaults;
use crate::error::GatewayError;
use crate::transport::InvokeModelRequest;
use crate::types::NormalizedResult;

const HUMAN_PREFIX: &str = "\n\nHuman: ";
const ASSISTANT_SUFFIX: &str = " \n\nAssistant:";

/// Wrap a user prompt in the dialogue template.
pub fn dialogue_prompt(prompt: &str) -> String {
    format!("{HUMAN_PREFIX}{prompt}{ASSISTANT_SUFFIX}")
}

#[derive(Debug, Clone)]
pub struct ClaudeAdapter {
    model_id: String,
}

impl ClaudeAdapter {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }

    fn provider_body(
        payload: &serde_json::Value,
    ) -> Result<serde_json::Map<String, serde_json::Value>, GatewayError> {
        let body = match payload.get("body") {
            Some(serde_json::Value::String(text)) => serde_json::from_str(text)
                .map_err(|e| GatewayError::InvalidRequest(format!("'body' is not JSON: {e}")))?,
            Some(other) => other.clone(),
            None => payload.clone(),
        };
        match body {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(GatewayError::InvalidRequest(
                "'body' must be a JSON object".to_string(),
            )),
        }
    }
}

impl Default for ClaudeAdapter {
    fn default() -> Self {
        Self::new(defaults::models::CLAUDE)
    }
}

impl ModelAdapter for ClaudeAdapter {
    fn id(&self) -> &'static str {
        "claude"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn build_request(
        &self,
        payload: &serde_json::Value,
    ) -> Result<InvokeModelRequest, GatewayError> {
        let mut body = Self::provider_body(payload)?;
        let prompt = body
            .get("prompt")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GatewayError::InvalidRequest("missing string field 'prompt'".into()))?;
        let wrapped = dialogue_prompt(prompt);
        body.insert("prompt".to_string(), serde_json::Value::String(wrapped));

        Ok(InvokeModelRequest::new(
            &self.model_id,
            serde_json::Value::Object(body).to_string(),
            defaults::media::JSON,
            defaults::media::JSON,
        ))
    }

    fn parse_response(&self, raw: &[u8]) -> Result<NormalizedResult, GatewayError> {
        let json = parse_provider_json(raw)?;
        let completion = json
            .get("completion")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GatewayError::malformed("missing 'completion'", raw))?;
        Ok(NormalizedResult::text(completion))
    }
}
