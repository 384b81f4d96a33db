//! Model invocation transports.
//!
//! An [`InferenceTransport`] performs one `invoke model` call. Two
//! implementations ship with the crate:
//! - [`RuntimeTransport`]: the primary stage, bound to a service resolved through an
//!   [`EndpointCatalog`]; unknown services fail with `UnsupportedService`.
//! - [`FallbackTransport`]: a direct SigV4-signed POST to the regional
//!   `/model/<modelId>/invoke` endpoint.
//!
//! Both return the raw status, headers and body; interpreting them is left to the
//! caller.

use crate::error::GatewayError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;

pub mod catalog;
pub mod signed;

pub use catalog::{EndpointCatalog, RuntimeTransport, ServiceDescriptor};
pub use signed::{FallbackTransport, signed_post};

/// One model invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeModelRequest {
    pub model_id: String,
    /// Provider-specific JSON text.
    pub body: String,
    pub accept: String,
    pub content_type: String,
}

impl InvokeModelRequest {
    pub fn new(
        model_id: impl Into<String>,
        body: impl Into<String>,
        accept: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            body: body.into(),
            accept: accept.into(),
            content_type: content_type.into(),
        }
    }

    /// Path of the invoke operation for this model.
    pub fn invoke_path(&self) -> String {
        format!("/model/{}/invoke", urlencoding::encode(&self.model_id))
    }
}

/// Raw HTTP response of a transport call.
#[derive(Debug, Clone)]
pub struct RawHttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawHttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub(crate) async fn from_response(resp: reqwest::Response) -> Result<Self, GatewayError> {
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?.to_vec();
        Ok(Self {
            status,
            headers,
            body,
        })
    }
}

/// A single-attempt model invocation strategy.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn invoke(&self, request: &InvokeModelRequest) -> Result<RawHttpResponse, GatewayError>;
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
