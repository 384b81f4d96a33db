//! Inference client: primary transport first, signed fallback second.
//!
//! The fallback stage runs only when the primary stage reports
//! `UnsupportedService`, and it runs exactly once. Every other primary error, and
//! any fallback error, is returned unchanged.

use crate::error::{GatewayError, classify_http_error};
use crate::transport::{InferenceTransport, InvokeModelRequest, RawHttpResponse};
use std::sync::Arc;

#[derive(Clone)]
pub struct InferenceClient {
    primary: Arc<dyn InferenceTransport>,
    fallback: Option<Arc<dyn InferenceTransport>>,
}

impl InferenceClient {
    /// Client with a primary stage only.
    pub fn new(primary: Arc<dyn InferenceTransport>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn InferenceTransport>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Invoke `model_id` with a provider body and content negotiation headers.
    pub async fn invoke(
        &self,
        model_id: &str,
        body: &str,
        accept: &str,
        content_type: &str,
    ) -> Result<RawHttpResponse, GatewayError> {
        let request = InvokeModelRequest::new(model_id, body, accept, content_type);
        self.invoke_request(&request).await
    }

    /// Invoke with a prepared request. Non-success statuses become `ApiError`.
    pub async fn invoke_request(
        &self,
        request: &InvokeModelRequest,
    ) -> Result<RawHttpResponse, GatewayError> {
        let response = match self.primary.invoke(request).await {
            Ok(response) => response,
            Err(GatewayError::UnsupportedService(service)) => {
                let Some(fallback) = &self.fallback else {
                    return Err(GatewayError::UnsupportedService(service));
                };
                tracing::info!(
                    target: "bedrock_gateway::http",
                    service = %service,
                    primary = self.primary.name(),
                    fallback = fallback.name(),
                    model_id = %request.model_id,
                    "primary transport does not recognize service, using fallback"
                );
                fallback.invoke(request).await?
            }
            Err(other) => return Err(other),
        };

        if !response.is_success() {
            return Err(classify_http_error(response.status, &response.body));
        }
        Ok(response)
    }
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.as_ref().map(|t| t.name()))
            .finish()
    }
}
