//! Error types shared by the client and the tool catalog.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FredError {
    /// Raised locally before any outbound call; the attempt is not counted.
    #[error(
        "FRED API rate limit reached ({limit} requests per {}s); try again shortly",
        .window.as_secs()
    )]
    RateLimited { limit: usize, window: Duration },

    /// Non-2xx response from the FRED API; body is passed through verbatim.
    #[error("FRED API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The outbound call itself failed (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// A 2xx response whose body was not valid JSON.
    #[error("invalid response body: {0}")]
    InvalidResponse(String),

    /// Client construction errors (invalid base URL).
    #[error("config error: {0}")]
    Config(String),

    /// Tool dispatch: no tool with this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Tool dispatch: arguments did not match the tool's parameter shape.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

pub type Result<T> = std::result::Result<T, FredError>;

impl From<reqwest::Error> for FredError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}
