#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use thiserror::Error;

/// Error code constants for type-safe error handling
pub mod code {
    pub const INVALID: &str = "INVALID";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const DEPENDENCY: &str = "DEPENDENCY";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const INTERNAL: &str = "INTERNAL";
}

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FinderError {
    /// Returns the protocol error code for this error
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) | Self::SerializationError(_) => code::INVALID,
            Self::ApiError(_) => code::UNAUTHORIZED,
            Self::HttpError(err) if err.is_timeout() => code::TIMEOUT,
            Self::HttpError(_) | Self::IoError(_) => code::DEPENDENCY,
            Self::Internal(_) => code::INTERNAL,
        }
    }

    /// Returns the exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigError(_) => 2,
            Self::ApiError(_) => 3,
            Self::HttpError(_) => 4,
            Self::IoError(_) => 7,
            Self::SerializationError(_) => 8,
            Self::Internal(_) => 9,
        }
    }
}

/// Failure of a single request against the Actions API.
///
/// `NotFound` is kept apart from every other failure class: the attempt
/// resolver treats it as "this run has no per-attempt breakdown" rather than
/// as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("request to {url} failed{}: {message}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::NotFound { url } | Self::Transport { url, .. } | Self::Decode { url, .. } => url,
        }
    }
}

/// Protocol error codes as documented in the CLI
pub const ERROR_CODES: &[(&str, &str, &str)] = &[
    (
        code::INVALID,
        "Invalid configuration or payload",
        "Check .finder/config.toml and the flags passed on the command line",
    ),
    (
        code::UNAUTHORIZED,
        "GitHub rejected the request",
        "Provide a token with repo and actions:read access via --token or GITHUB_TOKEN",
    ),
    (
        code::DEPENDENCY,
        "GitHub API is unreachable",
        "Check network access to the API base URL and retry",
    ),
    (
        code::TIMEOUT,
        "Request timed out",
        "Increase request_timeout_secs and retry",
    ),
    (
        code::INTERNAL,
        "Unexpected internal failure",
        "Inspect logs (RUST_LOG=debug) and retry",
    ),
];

/// Get error code details (description and fix) for a given error code
#[must_use]
pub fn get_error_info(error_code: &str) -> Option<(&'static str, &'static str)> {
    ERROR_CODES
        .iter()
        .find(|(code, _, _)| *code == error_code)
        .map(|(_, desc, fix)| (*desc, *fix))
}

pub type Result<T> = std::result::Result<T, FinderError>;
