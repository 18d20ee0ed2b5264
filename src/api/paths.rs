//! Endpoint paths, relative to the configured base URL.

pub const REGISTER: &str = "/auth/local/register";
pub const LOGIN: &str = "/auth/local";
pub const LOGOUT: &str = "/auth/logout";
pub const GOOGLE_CALLBACK: &str = "/auth/google/callback";

pub const USER: &str = "/user";
pub const USERS: &str = "/users";
pub const CURRENT_USER: &str = "/users/me";

pub const CATEGORIES: &str = "/categories";
pub const PRODUCTS: &str = "/products";
pub const CUSTOMERS: &str = "/customers";
pub const ORDERS: &str = "/orders";
pub const ORDER_ITEMS: &str = "/order-items";
pub const PURCHASES: &str = "/purchases";
pub const PURCHASE_ITEMS: &str = "/purchase-items";
pub const TRADERS: &str = "/traders";
pub const WAREHOUSES: &str = "/warehouses";
pub const INVENTORIES: &str = "/inventories";
pub const NOTIFICATIONS: &str = "/notifications";
pub const PAGES: &str = "/pages";

pub const UPLOAD: &str = "/upload";
pub const UPLOAD_FILES: &str = "/upload/files";

pub const LATEST_PRODUCTS: &str = "latest-sale";
