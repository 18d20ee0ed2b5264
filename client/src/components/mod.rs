//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome (route gating, loading state, pagination,
//! image uploads, dashboard navigation) while reading the session from Leptos
//! context.

pub mod image_uploader;
pub mod loading;
pub mod notification_bell;
pub mod pagination;
pub mod product_card;
pub mod route_gate;
pub mod sidebar;
pub mod site_header;
