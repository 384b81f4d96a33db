//! Inbound and outbound envelope types.

use serde::{Deserialize, Serialize};

/// Uniform result returned by every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedResult {
    /// Text generation output.
    Text { output_text: String },
    /// Label names from the vision service.
    Labels { labels: Vec<String> },
    /// Provider body relayed unchanged.
    PassThrough(serde_json::Value),
}

impl NormalizedResult {
    pub fn text(output_text: impl Into<String>) -> Self {
        Self::Text {
            output_text: output_text.into(),
        }
    }

    pub fn labels(labels: Vec<String>) -> Self {
        Self::Labels { labels }
    }

    pub fn output_text(&self) -> Option<&str> {
        match self {
            Self::Text { output_text } => Some(output_text),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Inbound call as delivered by the hosting boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayEvent {
    pub path: String,
    #[serde(rename = "httpMethod")]
    pub http_method: String,
    /// JSON-encoded payload; absent means an empty object.
    #[serde(default)]
    pub body: Option<String>,
}

impl GatewayEvent {
    pub fn new(
        path: impl Into<String>,
        http_method: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            http_method: http_method.into(),
            body: Some(body.into()),
        }
    }
}

/// Outbound envelope: `{ "statusCode": 200, "body": "<json>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn ok(result: &NormalizedResult) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(result)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalized_shapes_serialize_flat() {
        assert_eq!(
            NormalizedResult::text("hi").to_json().unwrap(),
            json!({"output_text": "hi"})
        );
        assert_eq!(
            NormalizedResult::labels(vec!["Cat".into()]).to_json().unwrap(),
            json!({"labels": ["Cat"]})
        );
        assert_eq!(
            NormalizedResult::PassThrough(json!({"foo": "bar"}))
                .to_json()
                .unwrap(),
            json!({"foo": "bar"})
        );
    }

    #[test]
    fn event_uses_wire_field_names() {
        let event: GatewayEvent = serde_json::from_value(json!({
            "path": "/api/call-stablediffusion",
            "httpMethod": "POST",
            "body": "{}"
        }))
        .unwrap();
        assert_eq!(event.http_method, "POST");
        assert_eq!(event.body.as_deref(), Some("{}"));

        let without_body: GatewayEvent =
            serde_json::from_value(json!({"path": "/x", "httpMethod": "GET"})).unwrap();
        assert!(without_body.body.is_none());
    }

    #[test]
    fn response_envelope_wire_format() {
        let resp = GatewayResponse::ok(&NormalizedResult::text("done")).unwrap();
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"statusCode": 200, "body": "{\"output_text\":\"done\"}"})
        );
    }
}
