//! Gateway assembly.
//!
//! [`GatewayBuilder`] wires configuration, credentials, transports and the
//! labeling backend into a ready [`Router`].

use crate::auth::{CredentialsProvider, SdkCredentialsProvider};
use crate::client::InferenceClient;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::router::Router;
use crate::transport::{EndpointCatalog, FallbackTransport, InferenceTransport, RuntimeTransport};
use crate::vision::{LabelDetector, RekognitionDetector};
use std::sync::Arc;

pub struct GatewayBuilder {
    config: GatewayConfig,
    http_client: Option<reqwest::Client>,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    catalog: EndpointCatalog,
    primary: Option<Arc<dyn InferenceTransport>>,
    fallback_enabled: bool,
    detector: Option<Arc<dyn LabelDetector>>,
}

impl GatewayBuilder {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http_client: None,
            credentials: None,
            catalog: EndpointCatalog::standard(),
            primary: None,
            fallback_enabled: true,
            detector: None,
        }
    }

    /// Builder from [`GatewayConfig::from_env`].
    pub fn from_env() -> Result<Self, GatewayError> {
        Ok(Self::new(GatewayConfig::from_env()?))
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Credentials source. Defaults to the AWS SDK chain for the configured region.
    pub fn with_credentials(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    pub fn with_catalog(mut self, catalog: EndpointCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the catalog-backed primary transport.
    pub fn with_primary_transport(mut self, transport: Arc<dyn InferenceTransport>) -> Self {
        self.primary = Some(transport);
        self
    }

    pub fn without_fallback(mut self) -> Self {
        self.fallback_enabled = false;
        self
    }

    /// Replace the Rekognition detector.
    pub fn with_label_detector(mut self, detector: Arc<dyn LabelDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub async fn build(self) -> Result<Router, GatewayError> {
        if self.config.region.trim().is_empty() {
            return Err(GatewayError::ConfigurationError(
                "region must not be empty".to_string(),
            ));
        }

        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build().map_err(|e| {
                GatewayError::ConfigurationError(format!("failed to build HTTP client: {e}"))
            })?,
        };
        let credentials: Arc<dyn CredentialsProvider> = match self.credentials {
            Some(provider) => provider,
            None => Arc::new(SdkCredentialsProvider::load_default(&self.config.region).await?),
        };

        let primary = self.primary.unwrap_or_else(|| {
            Arc::new(RuntimeTransport::from_config(
                &self.config,
                http.clone(),
                credentials.clone(),
                self.catalog,
            ))
        });
        let mut client = InferenceClient::new(primary);
        if self.fallback_enabled {
            client = client.with_fallback(Arc::new(FallbackTransport::from_config(
                &self.config,
                http,
                credentials.clone(),
            )));
        }

        let detector = self.detector.unwrap_or_else(|| {
            Arc::new(RekognitionDetector::from_config(&self.config, credentials))
        });

        tracing::debug!(
            target: "bedrock_gateway::router",
            region = %self.config.region,
            service = %self.config.inference_service,
            fallback = client.has_fallback(),
            "gateway assembled"
        );

        Ok(Router::standard(&self.config, Arc::new(client), detector))
    }
}
