//! HTTP front end for the gateway.
//!
//! Configuration comes from the environment; see `GatewayConfig::from_env`.
//! `BEDROCK_GATEWAY_LISTEN` sets the bind address.

use std::sync::Arc;

use bedrock_gateway::defaults;
use bedrock_gateway::gateway::GatewayBuilder;
use bedrock_gateway::server_adapters::{ErrorOptions, axum::into_service};
use bedrock_gateway::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = telemetry::init_from_env()?;

    let router = GatewayBuilder::from_env()?.build().await?;
    let listen = std::env::var("BEDROCK_GATEWAY_LISTEN")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| defaults::server::LISTEN_ADDR.to_string());

    tracing::info!(
        target: "bedrock_gateway::http",
        listen = %listen,
        routes = router.routes().len(),
        "starting gateway"
    );

    let app = into_service(Arc::new(router), ErrorOptions::production());
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
