//! Amazon Titan text generation.
//!
//! Request: `{"inputText": <payload.inputText>}`.
//! Response: `results[0].outputText`.

use super::{ModelAdapter, parse_provider_json, required_str};
use crate::defaults;
use crate::error::GatewayError;
use crate::transport::InvokeModelRequest;
use crate::types::NormalizedResult;

#[derive(Debug, Clone)]
pub struct TitanAdapter {
    model_id: String,
}

impl TitanAdapter {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

impl Default for TitanAdapter {
    fn default() -> Self {
        Self::new(defaults::models::TITAN)
    }
}

impl ModelAdapter for TitanAdapter {
    fn id(&self) -> &'static str {
        "titan"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn build_request(
        &self,
        payload: &serde_json::Value,
    ) -> Result<InvokeModelRequest, GatewayError> {
        let input_text = required_str(payload, "inputText")?;
        let body = serde_json::json!({ "inputText": input_text });
        Ok(InvokeModelRequest::new(
            &self.model_id,
            body.to_string(),
            defaults::media::JSON,
            defaults::media::JSON,
        ))
    }

    fn parse_response(&self, raw: &[u8]) -> Result<NormalizedResult, GatewayError> {
        let json = parse_provider_json(raw)?;
        let text = json
            .get("results")
            .and_then(|v| v.as_array())
            .and_then(|results| results.first())
            .and_then(|first| first.get("outputText"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| GatewayError::malformed("missing 'results[0].outputText'", raw))?;
        Ok(NormalizedResult::text(text))
    }
}
