//! Query key management.

use std::fmt;

/// Collection names used by the dashboard queries.
pub mod collections {
    pub const INVOICES: &str = "invoices";
    pub const NOTIFICATION_SETTING: &str = "notification-setting";
    pub const DASHBOARD_OVERVIEW: &str = "dashboard-overview";
    pub const COMPANIES: &str = "companies";
    pub const VESSELS: &str = "vessels";
    pub const CREWS: &str = "crews";
    pub const LICENSES: &str = "licenses";
    pub const INVITATIONS: &str = "invitations";
    pub const ROLES: &str = "roles";
    pub const VESSEL_TYPES: &str = "vessel-types";
    pub const CONTACT_US: &str = "contact-us";
    pub const USERS: &str = "users";
    pub const SESSIONS: &str = "sessions";
}

/// Identifies one cached query: a collection name plus optional parameters.
///
/// Displayed as the parts joined by `:`, e.g. `vessels:company:c-17`.
/// Invalidation works on prefixes, so invalidating `vessels` also covers
/// `vessels:all` and every `vessels:company:{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    parts: Vec<String>,
}

impl QueryKey {
    /// Key for a whole collection.
    pub fn new(collection: &str) -> Self {
        QueryKey {
            parts: vec![collection.to_string()],
        }
    }

    /// Append a parameter.
    pub fn with(mut self, part: impl fmt::Display) -> Self {
        self.parts.push(part.to_string());
        self
    }

    /// Build a key from all of its parts.
    pub fn from_parts(parts: &[&str]) -> Self {
        QueryKey {
            parts: parts.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Parse a displayed key back into parts.
    pub fn parse(key: &str) -> Self {
        QueryKey {
            parts: key.split(':').map(str::to_string).collect(),
        }
    }

    /// The collection this key belongs to (its first part).
    pub fn collection(&self) -> &str {
        self.parts.first().map(String::as_str).unwrap_or_default()
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Whether `self` starts with every part of `prefix`.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        prefix.parts.len() <= self.parts.len()
            && prefix.parts.iter().zip(&self.parts).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join(":"))
    }
}

impl From<&str> for QueryKey {
    fn from(collection: &str) -> Self {
        QueryKey::new(collection)
    }
}
