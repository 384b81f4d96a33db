//! Direct SigV4-signed HTTP transport.

use super::{InferenceTransport, InvokeModelRequest, RawHttpResponse, join_url};
use crate::auth::{Credentials, CredentialsProvider, SigV4Signer};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::sync::Arc;

/// Sign and send a POST request.
///
/// The credentials are a frozen snapshot used for this call only; the signature
/// is scoped to `(region, service_name, now)`. The response is returned as-is,
/// whatever its status.
pub async fn signed_post(
    http: &reqwest::Client,
    url: &str,
    body: Vec<u8>,
    mut headers: HeaderMap,
    credentials: &Credentials,
    region: &str,
    service_name: &str,
) -> Result<RawHttpResponse, GatewayError> {
    let parsed = Url::parse(url)
        .map_err(|e| GatewayError::TransportFailure(format!("invalid URL '{url}': {e}")))?;

    let signer = SigV4Signer::new(region, service_name);
    let signed = signer.sign(
        "POST",
        &parsed,
        &headers,
        &body,
        credentials,
        chrono::Utc::now(),
    )?;
    signed.apply_to(&mut headers)?;

    tracing::debug!(
        target: "bedrock_gateway::http",
        service = %service_name,
        region = %region,
        url = %parsed,
        "sending signed request"
    );

    let resp = http.post(parsed).headers(headers).body(body).send().await?;
    let raw = RawHttpResponse::from_response(resp).await?;

    tracing::debug!(
        target: "bedrock_gateway::http",
        service = %service_name,
        status = raw.status,
        "signed response received"
    );
    Ok(raw)
}

pub(crate) fn header_value(value: &str, field: &str) -> Result<HeaderValue, GatewayError> {
    HeaderValue::from_str(value)
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid {field} header: {e}")))
}

/// Fallback stage: signed POST to `<base>/model/<modelId>/invoke`.
///
/// `base` defaults to `https://<service>.<region>.<domain>`.
pub struct FallbackTransport {
    http: reqwest::Client,
    credentials: Arc<dyn CredentialsProvider>,
    base_url: String,
    region: String,
    signing_name: String,
}

impl FallbackTransport {
    pub fn new(
        http: reqwest::Client,
        credentials: Arc<dyn CredentialsProvider>,
        base_url: impl Into<String>,
        region: impl Into<String>,
        signing_name: impl Into<String>,
    ) -> Self {
        Self {
            http,
            credentials,
            base_url: base_url.into(),
            region: region.into(),
            signing_name: signing_name.into(),
        }
    }

    pub fn from_config(
        config: &GatewayConfig,
        http: reqwest::Client,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Self {
        Self::new(
            http,
            credentials,
            config.fallback_base_url(),
            config.region.clone(),
            config.inference_signing_name.clone(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl InferenceTransport for FallbackTransport {
    fn name(&self) -> &'static str {
        "signed-fallback"
    }

    async fn invoke(&self, request: &InvokeModelRequest) -> Result<RawHttpResponse, GatewayError> {
        let url = join_url(&self.base_url, &request.invoke_path());
        let headers = invoke_headers(request)?;
        let credentials = self.credentials.credentials().await?;
        signed_post(
            &self.http,
            &url,
            request.body.clone().into_bytes(),
            headers,
            &credentials,
            &self.region,
            &self.signing_name,
        )
        .await
    }
}

pub(crate) fn invoke_headers(request: &InvokeModelRequest) -> Result<HeaderMap, GatewayError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value(&request.accept, "accept")?);
    headers.insert(
        CONTENT_TYPE,
        header_value(&request.content_type, "content-type")?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentialsProvider;

    #[test]
    fn from_config_uses_service_pattern() {
        let config = GatewayConfig::new("us-east-1");
        let transport = FallbackTransport::from_config(
            &config,
            reqwest::Client::new(),
            Arc::new(StaticCredentialsProvider::new(Credentials::new("a", "b"))),
        );
        assert_eq!(transport.base_url(), "https://bedrock.us-east-1.amazonaws.com");
    }

    #[test]
    fn invoke_headers_forward_accept_and_content_type() {
        let req = InvokeModelRequest::new("m", "{}", "*/*", "application/json");
        let headers = invoke_headers(&req).unwrap();
        assert_eq!(headers.get(ACCEPT).unwrap(), "*/*");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }
}
