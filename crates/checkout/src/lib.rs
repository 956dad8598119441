//! Checkout of selected cart items.
//!
//! Each selected item goes through two remote steps, strictly one item at a
//! time:
//! 1. Create a transaction record
//! 2. Delete the cart item
//!
//! A failing step never aborts the batch. Every item ends with a tagged
//! outcome, and the batch ends with a single [`CheckoutReport`].

pub mod error;
pub mod latch;
pub mod orchestrator;
pub mod outcome;
pub mod session;

pub use error::CheckoutError;
pub use orchestrator::CheckoutOrchestrator;
pub use outcome::{CheckoutReport, ItemOutcome, ItemStatus, RefreshStatus};
pub use session::CartSession;
