//! Consumed interfaces of the cart checkout core.
//!
//! The cart and transaction resources are plain REST collections with CRUD
//! semantics. This crate defines the traits the core depends on, an
//! in-memory implementation with failure injection for tests, and a REST
//! implementation over HTTP.

pub mod error;
pub mod http;
pub mod identity;
pub mod memory;
pub mod resource;

pub use error::{ResourceError, Result};
pub use http::{RestClient, RestConfig};
pub use identity::{IdentityProvider, StaticIdentity};
pub use memory::{InMemoryCartResource, InMemoryTransactionResource};
pub use resource::{CartResource, TransactionResource};
