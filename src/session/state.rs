//! The resolved authentication state of this application instance.

use crate::api::types::Identity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Bootstrap has not settled yet.
    Resolving,
    Authenticated,
    Anonymous,
}

/// Snapshot of who is logged in.
///
/// Only the three constructors exist, so `identity` is present exactly when
/// `status` is [`SessionStatus::Authenticated`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
    status: SessionStatus,
}

impl Session {
    #[must_use]
    pub fn resolving() -> Self {
        Self { identity: None, status: SessionStatus::Resolving }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self { identity: None, status: SessionStatus::Anonymous }
    }

    #[must_use]
    pub fn authenticated(identity: Identity) -> Self {
        Self { identity: Some(identity), status: SessionStatus::Authenticated }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.status == SessionStatus::Resolving
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::resolving()
    }
}
