//! Credentials and request signing.
//!
//! Credentials are resolved through a [`CredentialsProvider`] once per signed
//! call and handed to the signer as a frozen snapshot; nothing here caches them
//! across calls.

use crate::error::GatewayError;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

pub mod chain;
pub mod sigv4;

pub use chain::SdkCredentialsProvider;
pub(crate) use chain::shared_provider;
pub use sigv4::{SigV4Signer, SignedHeaders};

/// A frozen `(access key, secret key, session token)` triple.
///
/// `Debug` output redacts the secret and the token.
#[derive(Clone)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: SecretString,
    session_token: Option<SecretString>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::from(secret_access_key.into()),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub(crate) fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    pub(crate) fn session_token(&self) -> Option<&str> {
        self.session_token.as_ref().map(|t| t.expose_secret())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Source of credentials for signed calls.
///
/// Implementations are asked once per call and must return a snapshot that
/// stays valid for that single signing operation.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    async fn credentials(&self) -> Result<Credentials, GatewayError>;
}

/// Fixed credentials, mostly for tests and externally managed secrets.
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
    async fn credentials(&self) -> Result<Credentials, GatewayError> {
        Ok(self.credentials.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secrets() {
        let creds = Credentials::new("AKIDEXAMPLE", "super-secret-key")
            .with_session_token("session-token-value");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("super-secret-key"));
        assert!(!rendered.contains("session-token-value"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn static_provider_returns_snapshot() {
        let provider = StaticCredentialsProvider::new(Credentials::new("AKID", "secret"));
        let creds = provider.credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKID");
        assert_eq!(creds.secret_access_key(), "secret");
        assert!(creds.session_token().is_none());
    }
}
