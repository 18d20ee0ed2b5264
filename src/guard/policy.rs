//! Declarative route → guard-chain table.
//!
//! DESIGN
//! ======
//! Each rule pairs a route pattern with the guards that wrap it, outermost
//! first, mirroring how the dashboard nests a role-restricted section inside
//! the dashboard area. Rules are matched in insertion order; routes without a
//! rule are public.

#[cfg(test)]
#[path = "policy_test.rs"]
mod policy_test;

use super::decision::{Guard, GuardState, evaluate_chain};
use crate::session::Session;

/// Everyone with dashboard access.
pub const DASHBOARD_ROLES: &[i64] = &[1995, 1996, 1999, 1, 2, 3, 4, 5];
/// Home, people, orders, purchases and notifications screens.
pub const OPERATIONS_ROLES: &[i64] = &[1995, 1, 2, 3, 4, 5];
/// Category and product screens.
pub const CATALOG_ROLES: &[i64] = &[1995, 1999, 1, 2, 3, 4, 5];

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
    /// Trailing `*`: matches zero or more remaining segments.
    Rest,
}

/// Path pattern such as `/dashboard/users/:id` or `/docs/*`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| match segment {
                "*" => Segment::Rest,
                s if s.starts_with(':') => Segment::Param,
                s => Segment::Literal(s.to_owned()),
            })
            .collect();
        Self { raw: pattern.to_owned(), segments }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a concrete path; query string and fragment are ignored.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut parts = split_path(strip_query(path));
        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Param => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(lit) => {
                    if parts.next() != Some(lit.as_str()) {
                        return false;
                    }
                }
            }
        }
        parts.next().is_none()
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyRule {
    pub pattern: RoutePattern,
    pub guards: Vec<Guard>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyTable {
    rules: Vec<PolicyRule>,
}

impl PolicyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; earlier rules win.
    #[must_use]
    pub fn rule(mut self, pattern: &str, guards: Vec<Guard>) -> Self {
        self.rules.push(PolicyRule { pattern: RoutePattern::parse(pattern), guards });
        self
    }

    /// Guard chain for `path`; empty for public routes.
    #[must_use]
    pub fn guards_for(&self, path: &str) -> &[Guard] {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map(|rule| rule.guards.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn evaluate(&self, path: &str, session: &Session) -> GuardState {
        evaluate_chain(self.guards_for(path), session)
    }

    /// Access rules for the storefront and admin dashboard.
    #[must_use]
    pub fn storefront() -> Self {
        let dashboard = Guard::roles(DASHBOARD_ROLES);
        let operations = vec![dashboard.clone(), Guard::roles(OPERATIONS_ROLES)];
        let catalog = vec![dashboard, Guard::roles(CATALOG_ROLES)];

        let mut table = Self::new()
            .rule("/login", vec![Guard::GuestOnly])
            .rule("/signup", vec![Guard::GuestOnly])
            .rule("/dashboard", operations.clone());

        for section in ["users", "customers", "traders", "orders", "purchases"] {
            let singular = section.trim_end_matches('s');
            table = table
                .rule(&format!("/dashboard/{section}"), operations.clone())
                .rule(&format!("/dashboard/{section}/:id"), operations.clone())
                .rule(&format!("/dashboard/{singular}/add"), operations.clone());
        }
        table = table.rule("/dashboard/notifications", operations);

        table
            .rule("/dashboard/categories", catalog.clone())
            .rule("/dashboard/categories/:id", catalog.clone())
            .rule("/dashboard/category/add", catalog.clone())
            .rule("/dashboard/products", catalog.clone())
            .rule("/dashboard/products/:id", catalog.clone())
            .rule("/dashboard/product/add", catalog)
    }
}
