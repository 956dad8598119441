//! Cart state for the checkout workflow.
//!
//! This crate provides:
//! - `CartStore`, the locally held view of the remote cart
//! - `SelectionSet` and the selection controller operations on the store
//! - `CartService`, which loads the store from the cart resource and
//!   performs single-item remote removal

pub mod error;
pub mod selection;
pub mod service;
pub mod store;

pub use error::{CartError, Result};
pub use selection::SelectionSet;
pub use service::{CartService, DEFAULT_PAGE_SIZE};
pub use store::CartStore;
