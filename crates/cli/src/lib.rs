//! Command-line front end for the cart checkout workflow.
//!
//! Talks to the cart and transaction REST collections and exposes the
//! `list`, `total`, `remove` and `checkout` commands.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::{Output, Selection};
pub use config::Config;
pub use error::{CliError, Result};
