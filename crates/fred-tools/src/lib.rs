//! FRED API client + MCP tool catalog.
//!
//! This crate holds everything the `fred-mcp` server needs that is not
//! transport-specific:
//! - an outbound rate limiter (FRED enforces 120 requests/minute per key)
//! - a thin typed client over the FRED REST API
//! - the MCP tool surface (schemas + dispatch) for the six query tools
//!
//! It intentionally contains **no** MCP transport logic.

pub mod client;
pub mod error;
pub mod rate_limit;
pub mod tools;

pub use client::FredClient;
pub use error::{FredError, Result};
pub use rate_limit::RateLimiter;
