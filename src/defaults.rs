//! Default Configuration Values
//!
//! Centralizes the constants used when no explicit configuration is given.

/// Remote model identifiers, one per model family.
///
/// These are opaque configuration values; nothing in the crate parses them.
pub mod models {
    pub const CLAUDE: &str = "anthropic.claude-v2";
    pub const TITAN: &str = "amazon.titan-tg1-large";
    pub const AI21: &str = "ai21.j2-grande-instruct";
    pub const STABLE_DIFFUSION: &str = "stability.stable-diffusion-xl";
}

/// Service names and endpoint pattern pieces.
pub mod services {
    /// Service the gateway asks the primary transport for.
    pub const INFERENCE: &str = "bedrock";

    /// Service used for SigV4 scoping of inference calls.
    pub const INFERENCE_SIGNING_NAME: &str = "bedrock";

    /// Runtime service known to the default endpoint catalog.
    pub const INFERENCE_RUNTIME: &str = "bedrock-runtime";

    pub const VISION: &str = "rekognition";

    pub const ENDPOINT_DOMAIN: &str = "amazonaws.com";
}

/// Content negotiation values sent with model invocations.
pub mod media {
    pub const JSON: &str = "application/json";
    pub const ANY: &str = "*/*";
}

/// Labeling service defaults.
pub mod vision {
    /// Upper bound on labels requested per image.
    pub const MAX_LABELS: u32 = 10;
}

/// Hosting adapter defaults.
pub mod server {
    pub const LISTEN_ADDR: &str = "0.0.0.0:8080";
}
