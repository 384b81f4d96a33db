//! Gateway configuration.
//!
//! `GatewayConfig` is built once at start-up, either explicitly with the
//! `with_*` setters or from the process environment with [`GatewayConfig::from_env`].

use crate::defaults;
use crate::error::GatewayError;

/// Model identifiers per family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIds {
    pub claude: String,
    pub titan: String,
    pub ai21: String,
    pub stable_diffusion: String,
}

impl Default for ModelIds {
    fn default() -> Self {
        Self {
            claude: defaults::models::CLAUDE.to_string(),
            titan: defaults::models::TITAN.to_string(),
            ai21: defaults::models::AI21.to_string(),
            stable_diffusion: defaults::models::STABLE_DIFFUSION.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub region: String,
    /// Domain suffix of regional endpoints (`<service>.<region>.<domain>`).
    pub endpoint_domain: String,
    /// Service requested from the primary transport; also the fallback host prefix.
    pub inference_service: String,
    /// Service name used to scope inference signatures.
    pub inference_signing_name: String,
    pub vision_service: String,
    /// Replaces `https://<service>.<region>.<domain>` for inference calls.
    pub inference_base_url: Option<String>,
    /// Replaces `https://<service>.<region>.<domain>` for labeling calls.
    pub vision_base_url: Option<String>,
    pub models: ModelIds,
    pub max_labels: u32,
}

impl GatewayConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint_domain: defaults::services::ENDPOINT_DOMAIN.to_string(),
            inference_service: defaults::services::INFERENCE.to_string(),
            inference_signing_name: defaults::services::INFERENCE_SIGNING_NAME.to_string(),
            vision_service: defaults::services::VISION.to_string(),
            inference_base_url: None,
            vision_base_url: None,
            models: ModelIds::default(),
            max_labels: defaults::vision::MAX_LABELS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `AWS_REGION` (or `AWS_DEFAULT_REGION`) is required; everything else falls
    /// back to [`defaults`].
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let region = get("AWS_REGION")
            .or_else(|| get("AWS_DEFAULT_REGION"))
            .ok_or_else(|| {
                GatewayError::ConfigurationError(
                    "AWS_REGION or AWS_DEFAULT_REGION must be set".to_string(),
                )
            })?;

        let mut config = Self::new(region);
        if let Some(service) = get("BEDROCK_GATEWAY_SERVICE") {
            config.inference_service = service;
        }
        if let Some(domain) = get("BEDROCK_GATEWAY_ENDPOINT_DOMAIN") {
            config.endpoint_domain = domain;
        }
        config.inference_base_url = get("BEDROCK_GATEWAY_INFERENCE_URL");
        config.vision_base_url = get("BEDROCK_GATEWAY_VISION_URL");

        if let Some(id) = get("BEDROCK_GATEWAY_MODEL_CLAUDE") {
            config.models.claude = id;
        }
        if let Some(id) = get("BEDROCK_GATEWAY_MODEL_TITAN") {
            config.models.titan = id;
        }
        if let Some(id) = get("BEDROCK_GATEWAY_MODEL_AI21") {
            config.models.ai21 = id;
        }
        if let Some(id) = get("BEDROCK_GATEWAY_MODEL_STABLE_DIFFUSION") {
            config.models.stable_diffusion = id;
        }

        Ok(config)
    }

    pub fn with_endpoint_domain(mut self, domain: impl Into<String>) -> Self {
        self.endpoint_domain = domain.into();
        self
    }

    pub fn with_inference_service(mut self, service: impl Into<String>) -> Self {
        self.inference_service = service.into();
        self
    }

    pub fn with_inference_base_url(mut self, url: impl Into<String>) -> Self {
        self.inference_base_url = Some(url.into());
        self
    }

    pub fn with_vision_base_url(mut self, url: impl Into<String>) -> Self {
        self.vision_base_url = Some(url.into());
        self
    }

    pub fn with_models(mut self, models: ModelIds) -> Self {
        self.models = models;
        self
    }

    /// Base URL of a regional endpoint: `https://<prefix>.<region>.<domain>`.
    pub fn regional_endpoint(&self, prefix: &str) -> String {
        format!("https://{}.{}.{}", prefix, self.region, self.endpoint_domain)
    }

    /// Base URL used by the fallback inference transport.
    pub fn fallback_base_url(&self) -> String {
        self.inference_base_url
            .clone()
            .unwrap_or_else(|| self.regional_endpoint(&self.inference_service))
    }

    pub fn vision_url(&self) -> String {
        self.vision_base_url
            .clone()
            .unwrap_or_else(|| self.regional_endpoint(&self.vision_service))
    }

    /// Labeling endpoint to force on the SDK client, when the configuration
    /// departs from the default regional Rekognition endpoint.
    pub fn vision_endpoint_override(&self) -> Option<String> {
        let custom = self.vision_base_url.is_some()
            || self.endpoint_domain != defaults::services::ENDPOINT_DOMAIN
            || self.vision_service != defaults::services::VISION;
        custom.then(|| self.vision_url())
    }
}
