//! Admit/deny state machine shared by both guard variants.
//!
//! States are `Pending` while the session resolves, then a terminal `Admit`
//! or `Deny`. Evaluation is a pure function of the session snapshot, so a
//! re-render can never flip a denied route into admitted content.

#[cfg(test)]
#[path = "decision_test.rs"]
mod decision_test;

use std::collections::BTreeSet;

use crate::api::types::RoleId;
use crate::session::{Session, SessionStatus};

pub const LANDING_ROUTE: &str = "/";
pub const LOGIN_ROUTE: &str = "/login";
pub const SIGNUP_ROUTE: &str = "/signup";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const WRITER_ROUTE: &str = "/dashboard/writer";

/// Role that the forbidden page sends to the writer area instead of home.
pub const WRITER_ROLE: RoleId = RoleId(1996);

/// A navigation the UI layer should perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl Redirect {
    #[must_use]
    pub const fn replace(to: &'static str) -> Self {
        Self { to, replace: true }
    }

    #[must_use]
    pub const fn push(to: &'static str) -> Self {
        Self { to, replace: false }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Denial {
    Redirect(Redirect),
    /// Valid session, role not allowed: render the forbidden page in place.
    Forbidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    /// Session still resolving: render a loading placeholder only.
    Pending,
    Admit,
    Deny(Denial),
}

impl GuardState {
    #[must_use]
    pub fn is_admit(self) -> bool {
        matches!(self, Self::Admit)
    }
}

/// Allow-list of role ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<RoleId>);

impl RoleSet {
    #[must_use]
    pub fn of(ids: &[i64]) -> Self {
        Self(ids.iter().copied().map(RoleId).collect())
    }

    /// A missing or non-numeric role is never a member.
    #[must_use]
    pub fn admits(&self, role: Option<RoleId>) -> bool {
        role.is_some_and(|id| self.0.contains(&id))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Guard {
    /// Logged-in users only; `allowed` narrows by role when present.
    Authenticated { allowed: Option<RoleSet> },
    /// Logged-out users only (login and sign-up forms).
    GuestOnly,
}

impl Guard {
    #[must_use]
    pub fn any_user() -> Self {
        Self::Authenticated { allowed: None }
    }

    #[must_use]
    pub fn roles(ids: &[i64]) -> Self {
        Self::Authenticated { allowed: Some(RoleSet::of(ids)) }
    }

    #[must_use]
    pub fn evaluate(&self, session: &Session) -> GuardState {
        match (self, session.status()) {
            (_, SessionStatus::Resolving) => GuardState::Pending,
            (Self::Authenticated { .. }, SessionStatus::Anonymous) => {
                GuardState::Deny(Denial::Redirect(Redirect::replace(LOGIN_ROUTE)))
            }
            (Self::Authenticated { allowed }, SessionStatus::Authenticated) => match allowed {
                Some(set) if !set.admits(session.identity().and_then(|i| i.role_id())) => {
                    GuardState::Deny(Denial::Forbidden)
                }
                _ => GuardState::Admit,
            },
            (Self::GuestOnly, SessionStatus::Authenticated) => {
                GuardState::Deny(Denial::Redirect(Redirect::replace(LANDING_ROUTE)))
            }
            (Self::GuestOnly, SessionStatus::Anonymous) => GuardState::Admit,
        }
    }
}

/// Evaluate nested guards outermost first; the first non-admit wins.
#[must_use]
pub fn evaluate_chain(guards: &[Guard], session: &Session) -> GuardState {
    for guard in guards {
        match guard.evaluate(session) {
            GuardState::Admit => {}
            other => return other,
        }
    }
    GuardState::Admit
}

/// Where the forbidden page's "back" link goes for a given role.
#[must_use]
pub fn forbidden_home_link(role: Option<RoleId>) -> &'static str {
    if role == Some(WRITER_ROLE) { WRITER_ROUTE } else { LANDING_ROUTE }
}
