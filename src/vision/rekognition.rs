//! Rekognition `DetectLabels` through the AWS SDK client.

use super::{Label, LabelDetector};
use crate::auth::{CredentialsProvider, shared_provider};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, classify_http_error};
use async_trait::async_trait;
use aws_sdk_rekognition::Client;
use aws_sdk_rekognition::config::http::HttpResponse;
use aws_sdk_rekognition::config::retry::RetryConfig;
use aws_sdk_rekognition::config::{BehaviorVersion, Region};
use aws_sdk_rekognition::error::{DisplayErrorContext, SdkError};
use aws_sdk_rekognition::operation::detect_labels::{DetectLabelsError, DetectLabelsOutput};
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::Image;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RekognitionDetector {
    client: Client,
}

impl RekognitionDetector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client for `config.region`, signing with `credentials`.
    ///
    /// SDK retries are disabled; a failed call surfaces as-is.
    pub fn from_config(config: &GatewayConfig, credentials: Arc<dyn CredentialsProvider>) -> Self {
        let mut builder = aws_sdk_rekognition::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(shared_provider(credentials))
            .retry_config(RetryConfig::disabled());
        builder.set_endpoint_url(config.vision_endpoint_override());
        let sdk_config = builder.build();
        Self::new(Client::from_conf(sdk_config))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl LabelDetector for RekognitionDetector {
    async fn detect_labels(
        &self,
        image: &[u8],
        max_labels: u32,
    ) -> Result<Vec<Label>, GatewayError> {
        let max_labels = i32::try_from(max_labels).map_err(|_| {
            GatewayError::InvalidRequest(format!("max_labels out of range: {max_labels}"))
        })?;

        tracing::debug!(
            target: "bedrock_gateway::http",
            image_bytes = image.len(),
            max_labels,
            "calling DetectLabels"
        );

        let output = self
            .client
            .detect_labels()
            .image(Image::builder().bytes(Blob::new(image)).build())
            .max_labels(max_labels)
            .send()
            .await
            .map_err(from_sdk_error)?;
        labels_from_output(output)
    }
}

fn from_sdk_error(err: SdkError<DetectLabelsError, HttpResponse>) -> GatewayError {
    match &err {
        SdkError::ServiceError(service) => {
            let raw = service.raw();
            let status = raw.status().as_u16();
            match raw.body().bytes() {
                Some(body) => classify_http_error(status, body),
                None => {
                    let meta = service.err().meta();
                    GatewayError::api_error(
                        status,
                        format!(
                            "{}: {}",
                            meta.code().unwrap_or("Unknown"),
                            meta.message().unwrap_or("no message")
                        ),
                    )
                }
            }
        }
        _ => GatewayError::TransportFailure(format!(
            "DetectLabels failed: {}",
            DisplayErrorContext(&err)
        )),
    }
}

fn labels_from_output(output: DetectLabelsOutput) -> Result<Vec<Label>, GatewayError> {
    let Some(labels) = output.labels.as_deref() else {
        return Err(GatewayError::malformed(
            "DetectLabels response has no Labels field",
            format!("{output:?}").as_bytes(),
        ));
    };

    labels
        .iter()
        .map(|label| {
            let name = label.name.clone().ok_or_else(|| {
                GatewayError::malformed(
                    "DetectLabels label has no Name",
                    format!("{label:?}").as_bytes(),
                )
            })?;
            Ok(Label::new(name, label.confidence.unwrap_or_default()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_rekognition::types::Label as RekognitionLabel;

    #[test]
    fn labels_keep_backend_order() {
        let output = DetectLabelsOutput::builder()
            .labels(RekognitionLabel::builder().name("Cat").confidence(98.1).build())
            .labels(RekognitionLabel::builder().name("Pet").build())
            .label_model_version("3.0")
            .build();
        let labels = labels_from_output(output).unwrap();
        assert_eq!(labels, vec![Label::new("Cat", 98.1), Label::new("Pet", 0.0)]);
    }

    #[test]
    fn missing_labels_field_is_malformed() {
        let output = DetectLabelsOutput::builder()
            .label_model_version("3.0")
            .build();
        let err = labels_from_output(output).unwrap_err();
        match err {
            GatewayError::MalformedProviderResponse { raw, .. } => {
                assert!(raw.contains("3.0"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_labels_list_is_not_an_error() {
        let output = DetectLabelsOutput::builder()
            .set_labels(Some(Vec::new()))
            .build();
        assert!(labels_from_output(output).unwrap().is_empty());
    }

    #[test]
    fn unnamed_label_is_malformed() {
        let output = DetectLabelsOutput::builder()
            .labels(RekognitionLabel::builder().confidence(50.0).build())
            .build();
        assert!(matches!(
            labels_from_output(output),
            Err(GatewayError::MalformedProviderResponse { .. })
        ));
    }

    #[tokio::test]
    async fn from_config_uses_gateway_region() {
        let config = GatewayConfig::new("ap-southeast-2");
        let creds = Arc::new(crate::auth::StaticCredentialsProvider::new(
            crate::auth::Credentials::new("AKID", "secret"),
        ));
        let detector = RekognitionDetector::from_config(&config, creds);
        assert_eq!(
            detector.client().config().region(),
            Some(&Region::new("ap-southeast-2"))
        );
    }
}
