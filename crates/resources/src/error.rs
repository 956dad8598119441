use thiserror::Error;

/// Errors returned by the remote resource clients.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The request never produced an HTTP response (connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The resource answered with a non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot address the resource.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The resource refused the operation.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// No current user could be resolved.
    #[error("Identity unavailable")]
    IdentityUnavailable,
}

/// Result type for resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;
