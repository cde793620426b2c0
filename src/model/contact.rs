use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow state of a contact-us message. Transitions are decided by the
/// server; the client only requests them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Open,
    Pending,
    Closed,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [
        ContactStatus::Open,
        ContactStatus::Pending,
        ContactStatus::Closed,
    ];

    /// Path segment and wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::Open => "open",
            ContactStatus::Pending => "pending",
            ContactStatus::Closed => "closed",
        }
    }

    /// Capitalized label.
    pub fn label(self) -> &'static str {
        match self {
            ContactStatus::Open => "Open",
            ContactStatus::Pending => "Pending",
            ContactStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(ContactStatus::Open),
            "pending" => Ok(ContactStatus::Pending),
            "closed" => Ok(ContactStatus::Closed),
            other => Err(crate::Error::ValidationError(format!(
                "Unknown contact status: {}",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ContactStatus::Pending).expect("encode");
        assert_eq!(json, "\"pending\"");
        let status: ContactStatus = serde_json::from_str("\"closed\"").expect("decode");
        assert_eq!(status, ContactStatus::Closed);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Open".parse::<ContactStatus>(), Ok(ContactStatus::Open));
        assert!("archived".parse::<ContactStatus>().is_err());
    }
}
