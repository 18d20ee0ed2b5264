//! Session store: who is logged in, resolved once per application load.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards read the session to decide admit/redirect/forbid; login,
//! sign-up and the OAuth callback page write it; logout clears it.

pub mod state;
pub mod store;

pub use state::{Session, SessionStatus};
pub use store::{AuthError, BootstrapOutcome, SessionStore, SignUpForm};
