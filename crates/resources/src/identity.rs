//! Source of the current user's identity.

use common::UserIdentity;

use crate::{ResourceError, Result};

/// Yields the display name of the current user.
///
/// The core only reads this value; session storage and authentication live
/// behind the implementation.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Result<UserIdentity>;
}

/// Identity fixed at construction, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserIdentity>,
}

impl StaticIdentity {
    /// Creates a provider that always yields `user`.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: Some(UserIdentity::new(user)),
        }
    }

    /// Creates a provider with no signed-in user.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Result<UserIdentity> {
        self.user
            .clone()
            .filter(|u| !u.name().is_empty())
            .ok_or(ResourceError::IdentityUnavailable)
    }
}
