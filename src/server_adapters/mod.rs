//! Hosting adapters: turn gateway results into HTTP responses.
//!
//! The helpers here are framework-agnostic. The axum integration lives in
//! [`axum`] behind the `server-adapters` feature.
//!
//! Errors map to statuses through [`GatewayError::status_code`]:
//!
//! | error | status |
//! |---|---|
//! | `UnroutableRequest` | 404 |
//! | `InvalidRequest`, `InvalidImageEncoding` | 400 |
//! | `ApiError` with a 4xx code | same code |
//! | other upstream and transport failures | 502 |
//! | `ConfigurationError` | 500 |

use crate::error::GatewayError;

#[cfg(feature = "server-adapters")]
pub mod axum;

/// Options for error bodies.
#[derive(Debug, Clone)]
pub struct ErrorOptions {
    /// Replace the message of 5xx errors with a generic one.
    ///
    /// Default: `true`
    pub mask_errors: bool,

    /// Message used when masking. Defaults to "internal error".
    pub masked_error_message: Option<String>,
}

impl Default for ErrorOptions {
    fn default() -> Self {
        Self {
            mask_errors: true,
            masked_error_message: None,
        }
    }
}

impl ErrorOptions {
    /// Options that keep every error message.
    pub fn development() -> Self {
        Self {
            mask_errors: false,
            ..Default::default()
        }
    }

    pub fn production() -> Self {
        Self::default()
    }
}

/// Status and JSON body for an error: `{"error": {"kind": ..., "message": ...}}`.
///
/// Client errors (4xx) always keep their message so callers can fix the request.
pub fn error_body(error: &GatewayError, opts: &ErrorOptions) -> (u16, serde_json::Value) {
    let status = error.status_code();
    let message = if opts.mask_errors && status >= 500 {
        opts.masked_error_message
            .clone()
            .unwrap_or_else(|| "internal error".to_string())
    } else {
        error.to_string()
    };
    let body = serde_json::json!({
        "error": {
            "kind": error.kind(),
            "message": message,
        }
    });
    (status, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_message() {
        let (status, body) = error_body(
            &GatewayError::unroutable("/unknown", "GET"),
            &ErrorOptions::production(),
        );
        assert_eq!(status, 404);
        assert_eq!(body["error"]["kind"], "unroutable_request");
        assert_eq!(body["error"]["message"], "No route registered for GET /unknown");

        let (status, _) = error_body(
            &GatewayError::InvalidImageEncoding("Invalid byte 42".into()),
            &ErrorOptions::production(),
        );
        assert_eq!(status, 400);
    }

    #[test]
    fn server_errors_are_masked_in_production() {
        let err = GatewayError::TransportFailure("dns error: bedrock.internal".into());

        let (status, body) = error_body(&err, &ErrorOptions::production());
        assert_eq!(status, 502);
        assert_eq!(body["error"]["kind"], "transport_failure");
        assert_eq!(body["error"]["message"], "internal error");

        let (_, body) = error_body(&err, &ErrorOptions::development());
        assert!(body["error"]["message"].as_str().unwrap().contains("dns error"));

        let custom = ErrorOptions {
            masked_error_message: Some("upstream unavailable".into()),
            ..ErrorOptions::default()
        };
        let (status, body) = error_body(
            &GatewayError::ConfigurationError("AWS_ACCESS_KEY_ID is not set".into()),
            &custom,
        );
        assert_eq!(status, 500);
        assert_eq!(body["error"]["message"], "upstream unavailable");
    }

    #[test]
    fn provider_client_errors_are_relayed() {
        let err = GatewayError::api_error(429, "ThrottlingException: Too many requests");
        let (status, body) = error_body(&err, &ErrorOptions::production());
        assert_eq!(status, 429);
        assert_eq!(
            body["error"]["message"],
            "API error 429: ThrottlingException: Too many requests"
        );
    }
}
