//! Request routing.
//!
//! The route table is a fixed map from `(path, method)` to a [`RouteHandler`].
//! It is assembled once through [`RouterBuilder`] and never changes afterwards.

use crate::adapters::{
    Ai21Adapter, ClaudeAdapter, ModelAdapter, ModelRoute, StableDiffusionAdapter, TitanAdapter,
};
use crate::client::InferenceClient;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::types::{GatewayEvent, GatewayResponse, NormalizedResult};
use crate::vision::{LabelDetector, VisionAdapter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;

/// Paths served by the standard route table.
pub mod paths {
    pub const REKOGNITION: &str = "/api/call-rekognition-api";
    pub const CLAUDE: &str = "/api/conversation/predict-claude";
    pub const TITAN: &str = "/api/conversation/predict-titan";
    pub const AI21: &str = "/api/conversation/predict-ai21";
    pub const STABLE_DIFFUSION: &str = "/api/call-stablediffusion";
}

/// A callable route target.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    /// Handler name used in logs.
    fn name(&self) -> &'static str;

    async fn handle(&self, payload: &serde_json::Value) -> Result<NormalizedResult, GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    pub path: String,
    pub method: String,
}

impl RouteKey {
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
        }
    }
}

impl std::fmt::Display for RouteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[derive(Default)]
pub struct RouterBuilder {
    routes: HashMap<RouteKey, Arc<dyn RouteHandler>>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. A later registration for the same key replaces the earlier one.
    pub fn route(
        mut self,
        path: impl Into<String>,
        method: impl Into<String>,
        handler: Arc<dyn RouteHandler>,
    ) -> Self {
        self.routes.insert(RouteKey::new(path, method), handler);
        self
    }

    pub fn build(self) -> Router {
        Router {
            routes: self.routes,
        }
    }
}

pub struct Router {
    routes: HashMap<RouteKey, Arc<dyn RouteHandler>>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// The standard five-route table.
    pub fn standard(
        config: &GatewayConfig,
        client: Arc<InferenceClient>,
        detector: Arc<dyn LabelDetector>,
    ) -> Self {
        let models = &config.models;

        Self::builder()
            .route(
                paths::REKOGNITION,
                "POST",
                Arc::new(VisionAdapter::new(detector).with_max_labels(config.max_labels)),
            )
            .route(
                paths::CLAUDE,
                "POST",
                model_route(ClaudeAdapter::new(&models.claude), &client),
            )
            .route(
                paths::TITAN,
                "POST",
                model_route(TitanAdapter::new(&models.titan), &client),
            )
            .route(
                paths::AI21,
                "POST",
                model_route(Ai21Adapter::new(&models.ai21), &client),
            )
            .route(
                paths::STABLE_DIFFUSION,
                "POST",
                model_route(StableDiffusionAdapter::new(&models.stable_diffusion), &client),
            )
            .build()
    }

    /// Exact lookup on path and method.
    pub fn resolve(
        &self,
        path: &str,
        method: &str,
    ) -> Result<&Arc<dyn RouteHandler>, GatewayError> {
        self.routes
            .get(&RouteKey::new(path, method))
            .ok_or_else(|| GatewayError::unroutable(path, method))
    }

    /// Registered keys, sorted.
    pub fn routes(&self) -> Vec<RouteKey> {
        let mut keys: Vec<RouteKey> = self.routes.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn dispatch(
        &self,
        path: &str,
        method: &str,
        payload: &serde_json::Value,
    ) -> Result<NormalizedResult, GatewayError> {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::debug_span!(
            target: "bedrock_gateway::router",
            "dispatch",
            request_id = %request_id,
            method = %method,
            path = %path
        );

        async {
            let handler = match self.resolve(path, method) {
                Ok(handler) => handler,
                Err(e) => {
                    tracing::debug!(target: "bedrock_gateway::router", "no route registered");
                    return Err(e);
                }
            };
            tracing::debug!(
                target: "bedrock_gateway::router",
                handler = handler.name(),
                "dispatching"
            );
            let result = handler.handle(payload).await;
            if let Err(e) = &result {
                tracing::debug!(
                    target: "bedrock_gateway::router",
                    handler = handler.name(),
                    kind = e.kind(),
                    "handler failed"
                );
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Handle a hosting event and wrap the result in the outbound envelope.
    ///
    /// A missing or empty body is treated as `{}`.
    pub async fn handle_event(
        &self,
        event: &GatewayEvent,
    ) -> Result<GatewayResponse, GatewayError> {
        let payload = match event.body.as_deref().map(str::trim) {
            None | Some("") => serde_json::Value::Object(serde_json::Map::new()),
            Some(body) => serde_json::from_str(body)
                .map_err(|e| GatewayError::InvalidRequest(format!("body is not valid JSON: {e}")))?,
        };
        let result = self
            .dispatch(&event.path, &event.http_method, &payload)
            .await?;
        Ok(GatewayResponse::ok(&result)?)
    }
}

fn model_route<A>(adapter: A, client: &Arc<InferenceClient>) -> Arc<dyn RouteHandler>
where
    A: ModelAdapter + 'static,
{
    Arc::new(ModelRoute::new(Arc::new(adapter), client.clone()))
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field(
                "routes",
                &self.routes().iter().map(|k| k.to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct EchoHandler {
        name: &'static str,
        calls: Mutex<Vec<serde_json::Value>>,
    }

    impl EchoHandler {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RouteHandler for EchoHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn handle(
            &self,
            payload: &serde_json::Value,
        ) -> Result<NormalizedResult, GatewayError> {
            self.calls.lock().unwrap().push(payload.clone());
            Ok(NormalizedResult::text(self.name))
        }
    }

    fn two_routes() -> (Router, Arc<EchoHandler>, Arc<EchoHandler>) {
        let titan = EchoHandler::new("titan");
        let claude = EchoHandler::new("claude");
        let router = Router::builder()
            .route(paths::TITAN, "POST", titan.clone())
            .route(paths::CLAUDE, "POST", claude.clone())
            .build();
        (router, titan, claude)
    }

    #[tokio::test]
    async fn dispatch_selects_handler_by_path_and_method() {
        let (router, titan, claude) = two_routes();

        let result = router
            .dispatch(paths::TITAN, "POST", &json!({"inputText": "hi"}))
            .await
            .unwrap();
        assert_eq!(result.output_text(), Some("titan"));
        assert_eq!(titan.call_count(), 1);
        assert_eq!(claude.call_count(), 0);
        assert_eq!(titan.calls.lock().unwrap()[0], json!({"inputText": "hi"}));
    }

    #[tokio::test]
    async fn unknown_pair_invokes_nothing() {
        let (router, titan, claude) = two_routes();

        let err = router.dispatch("/unknown", "GET", &json!({})).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::UnroutableRequest { ref path, ref method } if path == "/unknown" && method == "GET"
        ));

        // Known path, wrong method.
        let err = router.dispatch(paths::TITAN, "GET", &json!({})).await.unwrap_err();
        assert!(matches!(err, GatewayError::UnroutableRequest { .. }));

        // Matching is case sensitive.
        assert!(router.resolve(paths::TITAN, "post").is_err());
        assert_eq!(titan.call_count() + claude.call_count(), 0);
    }

    #[tokio::test]
    async fn handle_event_wraps_result() {
        let (router, titan, _) = two_routes();

        let response = router
            .handle_event(&GatewayEvent::new(paths::TITAN, "POST", r#"{"inputText":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, r#"{"output_text":"titan"}"#);

        let empty = GatewayEvent {
            path: paths::TITAN.to_string(),
            http_method: "POST".to_string(),
            body: None,
        };
        router.handle_event(&empty).await.unwrap();
        assert_eq!(titan.calls.lock().unwrap()[1], json!({}));
    }

    #[tokio::test]
    async fn handle_event_rejects_invalid_json() {
        let (router, titan, _) = two_routes();
        let err = router
            .handle_event(&GatewayEvent::new(paths::TITAN, "POST", "{not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
        assert_eq!(titan.call_count(), 0);
    }

    #[test]
    fn routes_are_listed_sorted() {
        let (router, _, _) = two_routes();
        let keys: Vec<String> = router.routes().iter().map(ToString::to_string).collect();
        assert_eq!(
            keys,
            vec![
                "POST /api/conversation/predict-claude",
                "POST /api/conversation/predict-titan",
            ]
        );
    }
}
