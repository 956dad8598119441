//! Checkout error types.

use cart::CartError;
use resources::ResourceError;
use thiserror::Error;

/// Batch-level errors.
///
/// Per-item failures are never errors at this level; they are reported as
/// [`ItemStatus`](crate::ItemStatus) variants inside the report.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Another checkout is still running on the same orchestrator.
    #[error("A checkout is already in progress")]
    AlreadyInFlight,

    /// The current user could not be resolved.
    #[error("Cannot resolve current user: {0}")]
    Identity(#[source] ResourceError),

    /// A cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
