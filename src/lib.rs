//! # bedrock-gateway
//!
//! Request-routing gateway in front of Amazon Bedrock model families and the
//! Rekognition labeling service.
//!
//! An inbound call `(path, method, JSON body)` is routed to exactly one handler:
//! a model adapter (Titan, AI21, Claude, Stable Diffusion) that shapes the
//! provider request and extracts the answer, or the vision adapter. Model calls
//! go through a two-stage [`client::InferenceClient`]: a catalog-backed primary
//! transport and, when the primary does not know the configured service, a
//! single SigV4-signed direct call.
//!
//! ```rust,ignore
//! use bedrock_gateway::gateway::GatewayBuilder;
//! use bedrock_gateway::types::GatewayEvent;
//!
//! let router = GatewayBuilder::from_env()?.build().await?;
//! let response = router
//!     .handle_event(&GatewayEvent::new(
//!         "/api/conversation/predict-titan",
//!         "POST",
//!         r#"{"inputText":"Write a haiku about autumn"}"#,
//!     ))
//!     .await?;
//! assert_eq!(response.status_code, 200);
//! ```

#![deny(unsafe_code)]

pub mod adapters;
pub mod auth;
pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod gateway;
pub mod router;
pub mod server_adapters;
pub mod telemetry;
pub mod transport;
pub mod types;
pub mod vision;

pub use client::InferenceClient;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use gateway::GatewayBuilder;
pub use router::{RouteHandler, Router};
pub use types::{GatewayEvent, GatewayResponse, NormalizedResult};

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;
