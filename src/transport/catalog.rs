//! Primary inference transport backed by a static endpoint catalog.
//!
//! The catalog plays the role of an SDK's generated service model: it lists the
//! services this client knows how to reach. Asking for anything else is a
//! service-discovery failure (`UnsupportedService`), which is the signal the
//! inference client uses to switch to the fallback stage.

use super::signed::{invoke_headers, signed_post};
use super::{InferenceTransport, InvokeModelRequest, RawHttpResponse, join_url};
use crate::auth::CredentialsProvider;
use crate::config::GatewayConfig;
use crate::defaults;
use crate::error::GatewayError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// How a known service is reached and signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Host prefix of the regional endpoint.
    pub endpoint_prefix: String,
    /// Service name used in the SigV4 credential scope.
    pub signing_name: String,
}

impl ServiceDescriptor {
    pub fn new(endpoint_prefix: impl Into<String>, signing_name: impl Into<String>) -> Self {
        Self {
            endpoint_prefix: endpoint_prefix.into(),
            signing_name: signing_name.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EndpointCatalog {
    services: HashMap<String, ServiceDescriptor>,
}

impl EndpointCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog with the inference runtime service only.
    pub fn standard() -> Self {
        Self::empty().with_service(
            defaults::services::INFERENCE_RUNTIME,
            ServiceDescriptor::new(
                defaults::services::INFERENCE_RUNTIME,
                defaults::services::INFERENCE_SIGNING_NAME,
            ),
        )
    }

    pub fn with_service(mut self, name: impl Into<String>, descriptor: ServiceDescriptor) -> Self {
        self.services.insert(name.into(), descriptor);
        self
    }

    pub fn resolve(&self, service: &str) -> Result<&ServiceDescriptor, GatewayError> {
        self.services
            .get(service)
            .ok_or_else(|| GatewayError::UnsupportedService(service.to_string()))
    }
}

/// Primary stage: invoke through a service resolved from the catalog.
pub struct RuntimeTransport {
    http: reqwest::Client,
    credentials: Arc<dyn CredentialsProvider>,
    catalog: EndpointCatalog,
    service: String,
    region: String,
    endpoint_domain: String,
    base_url_override: Option<String>,
}

impl RuntimeTransport {
    pub fn new(
        http: reqwest::Client,
        credentials: Arc<dyn CredentialsProvider>,
        catalog: EndpointCatalog,
        service: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            http,
            credentials,
            catalog,
            service: service.into(),
            region: region.into(),
            endpoint_domain: defaults::services::ENDPOINT_DOMAIN.to_string(),
            base_url_override: None,
        }
    }

    pub fn from_config(
        config: &GatewayConfig,
        http: reqwest::Client,
        credentials: Arc<dyn CredentialsProvider>,
        catalog: EndpointCatalog,
    ) -> Self {
        let mut transport = Self::new(
            http,
            credentials,
            catalog,
            config.inference_service.clone(),
            config.region.clone(),
        );
        transport.endpoint_domain = config.endpoint_domain.clone();
        transport.base_url_override = config.inference_base_url.clone();
        transport
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

#[async_trait]
impl InferenceTransport for RuntimeTransport {
    fn name(&self) -> &'static str {
        "runtime"
    }

    async fn invoke(&self, request: &InvokeModelRequest) -> Result<RawHttpResponse, GatewayError> {
        // Resolution happens before any I/O so an unknown service never touches the network.
        let descriptor = self.catalog.resolve(&self.service)?;

        let base = self.base_url_override.clone().unwrap_or_else(|| {
            format!(
                "https://{}.{}.{}",
                descriptor.endpoint_prefix, self.region, self.endpoint_domain
            )
        });
        let url = join_url(&base, &request.invoke_path());
        let headers = invoke_headers(request)?;
        let credentials = self.credentials.credentials().await?;

        signed_post(
            &self.http,
            &url,
            request.body.clone().into_bytes(),
            headers,
            &credentials,
            &self.region,
            &descriptor.signing_name,
        )
        .await
    }
}
