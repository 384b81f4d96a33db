//! Image labeling.
//!
//! [`VisionAdapter`] decodes the base64 image, asks a [`LabelDetector`] for
//! labels and keeps only their names.

use crate::error::GatewayError;
use crate::router::RouteHandler;
use crate::types::NormalizedResult;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;

pub mod rekognition;

pub use rekognition::RekognitionDetector;

/// One detected label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    pub confidence: f32,
}

impl Label {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Labeling backend.
#[async_trait]
pub trait LabelDetector: Send + Sync {
    async fn detect_labels(&self, image: &[u8], max_labels: u32)
    -> Result<Vec<Label>, GatewayError>;
}

pub struct VisionAdapter {
    detector: Arc<dyn LabelDetector>,
    max_labels: u32,
}

impl VisionAdapter {
    pub fn new(detector: Arc<dyn LabelDetector>) -> Self {
        Self {
            detector,
            max_labels: crate::defaults::vision::MAX_LABELS,
        }
    }

    pub fn with_max_labels(mut self, max_labels: u32) -> Self {
        self.max_labels = max_labels;
        self
    }

    /// Decode `image_base64` and return the detected label names in backend order.
    pub async fn detect_labels(
        &self,
        image_base64: &str,
    ) -> Result<NormalizedResult, GatewayError> {
        let image = STANDARD
            .decode(image_base64.trim())
            .map_err(|e| GatewayError::InvalidImageEncoding(e.to_string()))?;

        tracing::debug!(
            target: "bedrock_gateway::router",
            image_bytes = image.len(),
            max_labels = self.max_labels,
            "detecting labels"
        );

        let labels = self.detector.detect_labels(&image, self.max_labels).await?;
        Ok(NormalizedResult::labels(
            labels.into_iter().map(|label| label.name).collect(),
        ))
    }
}

#[async_trait]
impl RouteHandler for VisionAdapter {
    fn name(&self) -> &'static str {
        "vision"
    }

    async fn handle(&self, payload: &serde_json::Value) -> Result<NormalizedResult, GatewayError> {
        let image = crate::adapters::required_str(payload, "image")?;
        self.detect_labels(image).await
    }
}
