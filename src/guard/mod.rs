//! Route guards.
//!
//! `decision` is the per-guard state machine, `policy` the table saying which
//! guards wrap which route.

pub mod decision;
pub mod policy;

pub use decision::{
    DASHBOARD_ROUTE, Denial, Guard, GuardState, LANDING_ROUTE, LOGIN_ROUTE, Redirect, RoleSet, SIGNUP_ROUTE,
    WRITER_ROLE, WRITER_ROUTE, evaluate_chain, forbidden_home_link,
};
pub use policy::{PolicyTable, RoutePattern};
