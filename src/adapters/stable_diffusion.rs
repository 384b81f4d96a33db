//! Stability AI image generation.
//!
//! The payload's `body` is sent unchanged and the parsed provider body is
//! returned unchanged. The only check on the response is that it is JSON.

use super::{ModelAdapter, parse_provider_json};
use crate::defaults;
use crate::error::GatewayError;
use crate::transport::InvokeModelRequest;
use crate::types::NormalizedResult;

#[derive(Debug, Clone)]
pub struct StableDiffusionAdapter {
    model_id: String,
}

impl StableDiffusionAdapter {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

impl Default for StableDiffusionAdapter {
    fn default() -> Self {
        Self::new(defaults::models::STABLE_DIFFUSION)
    }
}

impl ModelAdapter for StableDiffusionAdapter {
    fn id(&self) -> &'static str {
        "stable-diffusion"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn build_request(
        &self,
        payload: &serde_json::Value,
    ) -> Result<InvokeModelRequest, GatewayError> {
        let body = match payload.get("body") {
            Some(serde_json::Value::String(text)) => text.clone(),
            Some(other) => serde_json::to_string(other)?,
            None => {
                return Err(GatewayError::InvalidRequest(
                    "missing field 'body'".to_string(),
                ));
            }
        };
        Ok(InvokeModelRequest::new(
            &self.model_id,
            body,
            defaults::media::JSON,
            defaults::media::JSON,
        ))
    }

    fn parse_response(&self, raw: &[u8]) -> Result<NormalizedResult, GatewayError> {
        parse_provider_json(raw).map(NormalizedResult::PassThrough)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_body_is_sent_verbatim() {
        let text = r#"{"text_prompts":[{"text":"a red fox"}],"cfg_scale":10,"seed":0}"#;
        let req = StableDiffusionAdapter::default()
            .build_request(&json!({"body": text}))
            .unwrap();
        assert_eq!(req.body, text);
        assert_eq!(req.model_id, "stability.stable-diffusion-xl");
    }

    #[test]
    fn object_body_is_serialized() {
        let inner = json!({"text_prompts": [{"text": "a red fox"}]});
        let req = StableDiffusionAdapter::default()
            .build_request(&json!({"body": inner.clone()}))
            .unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(&req.body).unwrap(), inner);
    }

    #[test]
    fn missing_body_is_invalid_request() {
        assert!(matches!(
            StableDiffusionAdapter::default().build_request(&json!({"prompt": "fox"})),
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[test]
    fn response_is_relayed_unmodified() {
        let result = StableDiffusionAdapter::default()
            .parse_response(br#"{"foo":"bar"}"#)
            .unwrap();
        assert_eq!(result, NormalizedResult::PassThrough(json!({"foo": "bar"})));
        assert_eq!(result.to_json().unwrap(), json!({"foo": "bar"}));
    }

    #[test]
    fn non_json_response_is_malformed() {
        assert!(matches!(
            StableDiffusionAdapter::default().parse_response(b"\x89PNG"),
            Err(GatewayError::MalformedProviderResponse { .. })
        ));
    }
}
