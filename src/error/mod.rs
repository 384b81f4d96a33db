//! Error handling types for the gateway.
//!
//! Every fallible operation in the crate returns [`GatewayError`]. The core never
//! masks or logs these errors; mapping them to HTTP statuses is the job of the
//! hosting boundary (see `GatewayError::status_code`).

pub mod classify;
mod conversions;
pub mod types;

pub use classify::classify_http_error;
pub use types::*;
