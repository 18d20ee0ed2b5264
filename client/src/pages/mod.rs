//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped fetching and form state and delegates shared
//! chrome to `components`. Storefront pages are public; everything under
//! `/dashboard` renders inside [`dashboard::DashboardLayout`].

pub mod contact;
pub mod dashboard;
pub mod entry_form;
pub mod errors;
pub mod google_callback;
pub mod home;
pub mod ledger_detail;
pub mod login;
pub mod notifications;
pub mod order_form;
pub mod product;
pub mod product_form;
pub mod resource_list;
pub mod section;
pub mod signup;
