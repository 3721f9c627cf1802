// src/error.rs
// =============================================================================
// Error types for the library half of raindrop-guardian.
//
// Only the failures that callers must see live here: configuration problems,
// transport errors on requests that matter (the first page, single lookups),
// non-2xx API answers and report I/O. Expected per-URL failures during link
// checking are NOT errors - they are classified into `LinkStatus` values.
//
// The binaries wrap these in anyhow::Error with extra context.
// =============================================================================

use thiserror::Error;

/// Everything that can go wrong in the library.
#[derive(Error, Debug)]
pub enum Error {
    /// No API token was configured.
    #[error("RAINDROP_TOKEN must be provided or set in environment")]
    MissingToken,

    /// A configuration value could not be parsed.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: &'static str, message: String },

    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("Raindrop API returned HTTP {status} for {url}")]
    Api { status: u16, url: String },

    /// A caller passed an argument the operation cannot work with.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading or writing a report file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A report could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shorthand used across the library.
pub type Result<T> = std::result::Result<T, Error>;
