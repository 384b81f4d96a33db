use thiserror::Error;

/// Coarse error category used by hosting boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller sent something the gateway cannot serve.
    Client,
    /// A remote service failed or answered with something unusable.
    Upstream,
    /// Network or signing failure.
    Network,
    /// Local misconfiguration (region, credentials).
    Configuration,
}

/// Unified gateway error.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// No handler is registered for the `(path, method)` pair.
    #[error("No route registered for {method} {path}")]
    UnroutableRequest { path: String, method: String },

    /// The primary inference transport does not recognize the service.
    #[error("Service not recognized by the primary transport: {0}")]
    UnsupportedService(String),

    /// A provider response lacked an expected field or was not JSON.
    ///
    /// `raw` holds the offending body for diagnostics.
    #[error("Malformed provider response: {message}")]
    MalformedProviderResponse { message: String, raw: String },

    /// The vision payload was not valid base64.
    #[error("Invalid image encoding: {0}")]
    InvalidImageEncoding(String),

    /// Network or signing error.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// A remote service answered with a non-success status.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The inbound body or payload could not be used.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or invalid local configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl GatewayError {
    pub fn unroutable(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnroutableRequest {
            path: path.into(),
            method: method.into(),
        }
    }

    /// Build a `MalformedProviderResponse` keeping a lossy copy of the raw body.
    pub fn malformed(message: impl Into<String>, raw: &[u8]) -> Self {
        Self::MalformedProviderResponse {
            message: message.into(),
            raw: String::from_utf8_lossy(raw).into_owned(),
        }
    }

    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn api_error_with_details(
        code: u16,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnroutableRequest { .. } => "unroutable_request",
            Self::UnsupportedService(_) => "unsupported_service",
            Self::MalformedProviderResponse { .. } => "malformed_provider_response",
            Self::InvalidImageEncoding(_) => "invalid_image_encoding",
            Self::TransportFailure(_) => "transport_failure",
            Self::ApiError { .. } => "api_error",
            Self::InvalidRequest(_) => "invalid_request",
            Self::ConfigurationError(_) => "configuration_error",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnroutableRequest { .. }
            | Self::InvalidImageEncoding(_)
            | Self::InvalidRequest(_) => ErrorCategory::Client,
            Self::ApiError { code, .. } if (400..500).contains(code) => ErrorCategory::Client,
            Self::UnsupportedService(_)
            | Self::MalformedProviderResponse { .. }
            | Self::ApiError { .. } => ErrorCategory::Upstream,
            Self::TransportFailure(_) => ErrorCategory::Network,
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
        }
    }

    /// HTTP status a hosting boundary should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnroutableRequest { .. } => 404,
            Self::InvalidImageEncoding(_) | Self::InvalidRequest(_) => 400,
            Self::ApiError { code, .. } if (400..500).contains(code) => *code,
            Self::ApiError { .. }
            | Self::UnsupportedService(_)
            | Self::MalformedProviderResponse { .. }
            | Self::TransportFailure(_) => 502,
            Self::ConfigurationError(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unroutable_maps_to_not_found() {
        let err = GatewayError::unroutable("/unknown", "GET");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.category(), ErrorCategory::Client);
        assert_eq!(err.to_string(), "No route registered for GET /unknown");
    }

    #[test]
    fn api_error_relays_client_codes_only() {
        assert_eq!(GatewayError::api_error(400, "bad image").status_code(), 400);
        assert_eq!(GatewayError::api_error(429, "slow down").status_code(), 429);
        let server = GatewayError::api_error(503, "unavailable");
        assert_eq!(server.status_code(), 502);
        assert_eq!(server.category(), ErrorCategory::Upstream);
    }

    #[test]
    fn malformed_keeps_raw_body() {
        let err = GatewayError::malformed("missing 'completion'", br#"{"other":1}"#);
        match err {
            GatewayError::MalformedProviderResponse { raw, .. } => {
                assert_eq!(raw, r#"{"other":1}"#)
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
