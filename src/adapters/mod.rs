//! Model family adapters.
//!
//! Each adapter turns a generic payload into the request body its model family
//! expects and extracts the documented field from that family's response. Adapters
//! are pure: they never touch the network and never mutate the payload.
//! [`ModelRoute`] pairs an adapter with an [`InferenceClient`] so it can be
//! registered in the router.

use crate::client::InferenceClient;
use crate::error::GatewayError;
use crate::router::RouteHandler;
use crate::transport::InvokeModelRequest;
use crate::types::NormalizedResult;
use async_trait::async_trait;
use std::sync::Arc;

pub mod ai21;
pub mod claude;
pub mod stable_diffusion;
pub mod titan;

pub use ai21::Ai21Adapter;
pub use claude::ClaudeAdapter;
pub use stable_diffusion::StableDiffusionAdapter;
pub use titan::TitanAdapter;

/// Request/response translation for one model family.
pub trait ModelAdapter: Send + Sync {
    /// Adapter identifier used in logs.
    fn id(&self) -> &'static str;

    fn model_id(&self) -> &str;

    /// Build the provider request from the inbound payload.
    fn build_request(&self, payload: &serde_json::Value)
    -> Result<InvokeModelRequest, GatewayError>;

    /// Extract the normalized result from a raw provider body.
    fn parse_response(&self, raw: &[u8]) -> Result<NormalizedResult, GatewayError>;
}

/// Parse a provider body as JSON, keeping the raw text on failure.
pub(crate) fn parse_provider_json(raw: &[u8]) -> Result<serde_json::Value, GatewayError> {
    serde_json::from_slice(raw)
        .map_err(|e| GatewayError::malformed(format!("response is not valid JSON: {e}"), raw))
}

/// Read a required string field from the inbound payload.
pub(crate) fn required_str<'a>(
    payload: &'a serde_json::Value,
    field: &str,
) -> Result<&'a str, GatewayError> {
    payload
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| GatewayError::InvalidRequest(format!("missing string field '{field}'")))
}

/// Route handler invoking a model through the inference client.
pub struct ModelRoute {
    adapter: Arc<dyn ModelAdapter>,
    client: Arc<InferenceClient>,
}

impl ModelRoute {
    pub fn new(adapter: Arc<dyn ModelAdapter>, client: Arc<InferenceClient>) -> Self {
        Self { adapter, client }
    }

    pub fn adapter(&self) -> &dyn ModelAdapter {
        self.adapter.as_ref()
    }
}

#[async_trait]
impl RouteHandler for ModelRoute {
    fn name(&self) -> &'static str {
        self.adapter.id()
    }

    async fn handle(&self, payload: &serde_json::Value) -> Result<NormalizedResult, GatewayError> {
        let request = self.adapter.build_request(payload)?;
        tracing::debug!(
            target: "bedrock_gateway::router",
            adapter = self.adapter.id(),
            model_id = %request.model_id,
            "invoking model"
        );
        let response = self.client.invoke_request(&request).await?;
        self.adapter.parse_response(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_provider_json_keeps_raw_on_failure() {
        let err = parse_provider_json(b"<html>oops</html>").unwrap_err();
        match err {
            GatewayError::MalformedProviderResponse { raw, .. } => {
                assert_eq!(raw, "<html>oops</html>")
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn required_str_rejects_non_strings() {
        let payload = json!({"inputText": 42});
        assert!(matches!(
            required_str(&payload, "inputText"),
            Err(GatewayError::InvalidRequest(_))
        ));
        assert!(required_str(&json!({"inputText": "hi"}), "inputText").is_ok());
    }
}
