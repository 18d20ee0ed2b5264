//! # storefront
//!
//! Client core for the storefront and admin dashboard that sit on top of the
//! hosted headless-CMS REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` resolves who is logged in from the persisted credential token,
//! `guard` turns that session into admit/redirect/forbid decisions per route,
//! and `api` is the single request pipeline every screen goes through. The
//! `client` crate renders all of this with Leptos; nothing here touches the
//! DOM, so the whole crate is exercised natively in tests.

pub mod api;
pub mod config;
pub mod guard;
pub mod listing;
pub mod session;
pub mod storage;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;
