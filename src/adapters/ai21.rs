//! AI21 Jurassic instruct models.
//!
//! The whole payload is forwarded as the request body; the answer is read from
//! `completions[0].data.text`.

use super::{ModelAdapter, parse_provider_json};
use crate::defaults;
use crate::error::GatewayError;
use crate::transport::InvokeModelRequest;
use crate::types::NormalizedResult;

#[derive(Debug, Clone)]
pub struct Ai21Adapter {
    model_id: String,
}

impl Ai21Adapter {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

impl Default for Ai21Adapter {
    fn default() -> Self {
        Self::new(defaults::models::AI21)
    }
}

impl ModelAdapter for Ai21Adapter {
    fn id(&self) -> &'static str {
        "ai21"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn build_request(
        &self,
        payload: &serde_json::Value,
    ) -> Result<InvokeModelRequest, GatewayError> {
        Ok(InvokeModelRequest::new(
            &self.model_id,
            serde_json::to_string(payload)?,
            defaults::media::ANY,
            defaults::media::JSON,
        ))
    }

    fn parse_response(&self, raw: &[u8]) -> Result<NormalizedResult, GatewayError> {
        let json = parse_provider_json(raw)?;
        let text = json
            .get("completions")
            .and_then(|v| v.as_array())
            .and_then(|completions| completions.first())
            .and_then(|first| first.get("data"))
            .and_then(|data| data.get("text"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| GatewayError::malformed("missing 'completions[0].data.text'", raw))?;
        Ok(NormalizedResult::text(text))
    }
}
