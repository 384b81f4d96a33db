#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bedrock_gateway::auth::{Credentials, CredentialsProvider, StaticCredentialsProvider};
use bedrock_gateway::error::GatewayError;
use bedrock_gateway::transport::{InferenceTransport, InvokeModelRequest, RawHttpResponse};
use bedrock_gateway::vision::{Label, LabelDetector};
use reqwest::header::HeaderMap;

pub const ACCESS_KEY_ID: &str = "AKIDEXAMPLE";
pub const SECRET_ACCESS_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";
pub const SESSION_TOKEN: &str = "session-token-example";

/// 1x1 transparent PNG.
pub const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn static_credentials() -> Arc<dyn CredentialsProvider> {
    Arc::new(StaticCredentialsProvider::new(
        Credentials::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY).with_session_token(SESSION_TOKEN),
    ))
}

/// Transport that records every request and answers from a fixed script.
pub struct RecordingTransport {
    name: &'static str,
    reply: Result<RawHttpResponse, GatewayError>,
    requests: Mutex<Vec<InvokeModelRequest>>,
}

impl RecordingTransport {
    pub fn replying(name: &'static str, status: u16, body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply: Ok(RawHttpResponse {
                status,
                headers: HeaderMap::new(),
                body: body.to_string().into_bytes(),
            }),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(name: &'static str, error: GatewayError) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply: Err(error),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<InvokeModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceTransport for RecordingTransport {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn invoke(&self, request: &InvokeModelRequest) -> Result<RawHttpResponse, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

/// Label detector answering with fixed labels.
pub struct StubDetector {
    labels: Vec<Label>,
    calls: Mutex<usize>,
}

impl StubDetector {
    pub fn new(labels: Vec<Label>) -> Arc<Self> {
        Arc::new(Self {
            labels,
            calls: Mutex::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LabelDetector for StubDetector {
    async fn detect_labels(
        &self,
        _image: &[u8],
        max_labels: u32,
    ) -> Result<Vec<Label>, GatewayError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.labels.iter().take(max_labels as usize).cloned().collect())
    }
}
