//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (storage, timers, file inputs)
//! behind functions that no-op natively, so pages compile and test without a
//! browser.

pub mod auth;
pub mod files;
pub mod storage;
pub mod task;
