//! AWS SDK credential chain.
//!
//! [`SdkCredentialsProvider`] resolves credentials the way the AWS SDKs do:
//! environment variables, shared config and credentials files, web identity,
//! container credentials and the instance metadata service.

use super::{Credentials, CredentialsProvider};
use crate::error::GatewayError;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials as AwsCredentials;
use aws_credential_types::provider::error::CredentialsError;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider, future};
use std::sync::Arc;

const PROVIDER_NAME: &str = "bedrock-gateway";

/// [`CredentialsProvider`] over an SDK [`SharedCredentialsProvider`].
///
/// Every call asks the underlying provider again and freezes the result.
#[derive(Debug, Clone)]
pub struct SdkCredentialsProvider {
    inner: SharedCredentialsProvider,
}

impl SdkCredentialsProvider {
    pub fn new(provider: impl ProvideCredentials + 'static) -> Self {
        Self {
            inner: SharedCredentialsProvider::new(provider),
        }
    }

    /// Use the credentials provider of an already loaded [`SdkConfig`].
    pub fn from_sdk_config(config: &SdkConfig) -> Result<Self, GatewayError> {
        config
            .credentials_provider()
            .map(|inner| Self { inner })
            .ok_or_else(|| {
                GatewayError::ConfigurationError(
                    "no AWS credentials provider is configured".to_string(),
                )
            })
    }

    /// Load the default chain for `region`.
    pub async fn load_default(region: &str) -> Result<Self, GatewayError> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::from_sdk_config(&sdk_config)
    }
}

#[async_trait]
impl CredentialsProvider for SdkCredentialsProvider {
    async fn credentials(&self) -> Result<Credentials, GatewayError> {
        let resolved = self.inner.provide_credentials().await.map_err(|e| {
            GatewayError::ConfigurationError(format!("failed to resolve AWS credentials: {e}"))
        })?;

        tracing::debug!(
            target: "bedrock_gateway::auth",
            temporary = resolved.session_token().is_some(),
            "credentials resolved"
        );
        Ok(Credentials::from(&resolved))
    }
}

impl From<&AwsCredentials> for Credentials {
    fn from(resolved: &AwsCredentials) -> Self {
        let credentials = Credentials::new(resolved.access_key_id(), resolved.secret_access_key());
        match resolved.session_token() {
            Some(token) => credentials.with_session_token(token),
            None => credentials,
        }
    }
}

/// Expose a gateway [`CredentialsProvider`] to AWS SDK clients.
pub(crate) fn shared_provider(provider: Arc<dyn CredentialsProvider>) -> SharedCredentialsProvider {
    SharedCredentialsProvider::new(GatewayCredentials(provider))
}

struct GatewayCredentials(Arc<dyn CredentialsProvider>);

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GatewayCredentials")
    }
}

impl ProvideCredentials for GatewayCredentials {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::new(async move {
            let snapshot = self
                .0
                .credentials()
                .await
                .map_err(CredentialsError::provider_error)?;
            Ok(AwsCredentials::new(
                snapshot.access_key_id(),
                snapshot.secret_access_key(),
                snapshot.session_token().map(str::to_string),
                None,
                PROVIDER_NAME,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentialsProvider;

    #[derive(Debug)]
    struct Unavailable;

    impl ProvideCredentials for Unavailable {
        fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
        where
            Self: 'a,
        {
            future::ProvideCredentials::ready(Err(CredentialsError::not_loaded(
                "no profile or instance role",
            )))
        }
    }

    #[tokio::test]
    async fn snapshot_carries_session_token() {
        let provider = SdkCredentialsProvider::new(AwsCredentials::new(
            "AKIDROLE",
            "role-secret",
            Some("role-token".to_string()),
            None,
            "test",
        ));
        let creds = provider.credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKIDROLE");
        assert_eq!(creds.secret_access_key(), "role-secret");
        assert_eq!(creds.session_token(), Some("role-token"));
    }

    #[tokio::test]
    async fn loaded_sdk_config_supplies_provider() {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .credentials_provider(AwsCredentials::new(
                "AKIDCONF",
                "conf-secret",
                None,
                None,
                "test",
            ))
            .load()
            .await;
        let provider = SdkCredentialsProvider::from_sdk_config(&sdk_config).unwrap();
        let creds = provider.credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKIDCONF");
        assert!(creds.session_token().is_none());
    }

    #[test]
    fn config_without_provider_is_rejected() {
        let sdk_config = SdkConfig::builder().build();
        let err = SdkCredentialsProvider::from_sdk_config(&sdk_config).unwrap_err();
        assert!(matches!(err, GatewayError::ConfigurationError(_)));
    }

    #[tokio::test]
    async fn chain_failure_is_configuration_error() {
        let err = SdkCredentialsProvider::new(Unavailable)
            .credentials()
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ConfigurationError(_)));
    }

    #[tokio::test]
    async fn gateway_provider_feeds_sdk_clients() {
        let gateway: Arc<dyn CredentialsProvider> = Arc::new(StaticCredentialsProvider::new(
            Credentials::new("AKIDSTATIC", "static-secret").with_session_token("static-token"),
        ));
        let resolved = shared_provider(gateway).provide_credentials().await.unwrap();
        assert_eq!(resolved.access_key_id(), "AKIDSTATIC");
        assert_eq!(resolved.secret_access_key(), "static-secret");
        assert_eq!(resolved.session_token(), Some("static-token"));
    }
}
