//! Records exchanged with the remote cart and transaction resources.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CartItemId, DocumentId, Money};

/// Customer name recorded when a cart item has no owning user.
pub const GUEST_CUSTOMER: &str = "Guest";

/// A product/quantity pair pending purchase, as stored by the cart resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Local item identifier.
    pub id: CartItemId,

    /// Remote document identifier, used for deletion.
    #[serde(rename = "documentId")]
    pub document_id: DocumentId,

    /// Human-readable product name.
    pub product_name: String,

    /// Quantity in the cart.
    pub quantity: u32,

    /// Unit price.
    pub price: Money,

    /// Owning user, if the record carries one.
    #[serde(default)]
    pub user_name: Option<String>,

    /// Branch the item was added from.
    #[serde(default)]
    pub branch_name: Option<String>,
}

impl CartItem {
    /// Creates a cart item with no owning user or branch.
    pub fn new(
        id: u64,
        document_id: impl Into<DocumentId>,
        product_name: impl Into<String>,
        quantity: u32,
        price: Money,
    ) -> Self {
        Self {
            id: CartItemId::new(id),
            document_id: document_id.into(),
            product_name: product_name.into(),
            quantity,
            price,
            user_name: None,
            branch_name: None,
        }
    }

    /// Sets the owning user.
    pub fn with_user(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Sets the branch.
    pub fn with_branch(mut self, branch_name: impl Into<String>) -> Self {
        self.branch_name = Some(branch_name.into());
        self
    }

    /// Returns `price * quantity`, saturating on overflow.
    pub fn line_total(&self) -> Money {
        self.price.multiply(self.quantity)
    }

    /// Returns `price * quantity`, or `None` if it overflows.
    pub fn checked_line_total(&self) -> Option<Money> {
        self.price.checked_multiply(self.quantity)
    }

    /// Returns the customer name to record for this item.
    ///
    /// Falls back to [`GUEST_CUSTOMER`] when the owning user is missing or
    /// empty.
    pub fn customer_name(&self) -> &str {
        self.user_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(GUEST_CUSTOMER)
    }
}

/// Payload for creating a transaction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub product_name: String,
    pub quantity: u32,
    pub total: Money,
    pub customer_name: String,
    /// Calendar day of the checkout, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
}

impl NewTransaction {
    /// Snapshots a cart item into a transaction payload dated `date`.
    pub fn from_cart_item(item: &CartItem, date: NaiveDate) -> Self {
        Self {
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            total: item.line_total(),
            customer_name: item.customer_name().to_string(),
            date,
            branch_name: item.branch_name.clone(),
        }
    }
}

/// A transaction record as persisted by the transaction resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Server-assigned numeric identifier.
    pub id: u64,

    /// Server-assigned document identifier, when the resource provides one.
    #[serde(rename = "documentId", default)]
    pub document_id: Option<DocumentId>,

    #[serde(flatten)]
    pub details: NewTransaction,
}
