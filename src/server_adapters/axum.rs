//! Axum hosting adapter.
//!
//! Every inbound request is handed to the gateway router as a
//! [`GatewayEvent`]; axum does no routing of its own, so the gateway's route
//! table stays the single source of truth.
//!
//! ```rust,ignore
//! use bedrock_gateway::gateway::GatewayBuilder;
//! use bedrock_gateway::server_adapters::{ErrorOptions, axum::into_service};
//!
//! let router = GatewayBuilder::from_env()?.build().await?;
//! let app = into_service(std::sync::Arc::new(router), ErrorOptions::production());
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

use super::{ErrorOptions, error_body};
use crate::error::GatewayError;
use crate::router::Router as GatewayRouter;
use crate::types::GatewayEvent;

#[derive(Clone)]
struct AppState {
    router: Arc<GatewayRouter>,
    opts: ErrorOptions,
}

/// Build an axum app that forwards every request to `router`.
pub fn into_service(router: Arc<GatewayRouter>, opts: ErrorOptions) -> axum::Router {
    axum::Router::new()
        .fallback(handle)
        .with_state(AppState { router, opts })
}

async fn handle(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let body = match String::from_utf8(body.to_vec()) {
        Ok(body) => body,
        Err(_) => {
            return to_error_response(
                &GatewayError::InvalidRequest("body is not valid UTF-8".to_string()),
                &state.opts,
            );
        }
    };
    let event = GatewayEvent {
        path: uri.path().to_string(),
        http_method: method.as_str().to_string(),
        body: Some(body),
    };

    match state.router.handle_event(&event).await {
        Ok(response) => json_response(
            StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::OK),
            response.body,
        ),
        Err(e) => to_error_response(&e, &state.opts),
    }
}

/// Convert a gateway error into a JSON error response.
pub fn to_error_response(error: &GatewayError, opts: &ErrorOptions) -> Response {
    let (status, body) = error_body(error, opts);
    if status >= 500 {
        tracing::warn!(
            target: "bedrock_gateway::http",
            kind = error.kind(),
            status,
            "request failed"
        );
    }
    json_response(
        StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
        body.to_string(),
    )
}

fn json_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        Body::from(body),
    )
        .into_response()
}
