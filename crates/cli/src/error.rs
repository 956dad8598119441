//! CLI error types.

use checkout::CheckoutError;
use resources::ResourceError;
use thiserror::Error;

/// Errors surfaced to the command-line user.
#[derive(Debug, Error)]
pub enum CliError {
    /// The REST client could not be built.
    #[error("Cannot create API client: {0}")]
    Client(#[from] ResourceError),

    /// A cart or checkout operation failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Output could not be serialized.
    #[error("Cannot render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl From<cart::CartError> for CliError {
    fn from(err: cart::CartError) -> Self {
        CliError::Checkout(CheckoutError::Cart(err))
    }
}

/// Convenience type alias for CLI results.
pub type Result<T> = std::result::Result<T, CliError>;
