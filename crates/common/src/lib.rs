//! Shared types for the cart checkout workspace.
//!
//! Identifiers, the `Money` amount type and the records exchanged with the
//! remote cart and transaction resources.

mod money;
mod records;
mod types;

pub use money::Money;
pub use records::{CartItem, GUEST_CUSTOMER, NewTransaction, TransactionRecord};
pub use types::{CartItemId, CheckoutId, DocumentId, UserIdentity};
