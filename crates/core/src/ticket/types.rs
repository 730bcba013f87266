//! Ticket data model.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Status assigned to every freshly created ticket.
pub const DEFAULT_STATUS: &str = "open";

/// A support request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Store-assigned identifier, never reused.
    pub id: u64,
    /// Short summary supplied by the requester.
    pub title: String,
    /// Free-form details supplied by the requester.
    pub description: String,
    /// Free-text status. The store sets it to "open" and never changes it.
    #[serde(default = "default_status")]
    pub status: String,
    /// Creation moment (UTC).
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Build a new open ticket stamped with the current time.
    pub fn new(id: u64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            status: default_status(),
            created_at: Utc::now(),
        }
    }
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

/// Parse an ISO-8601 timestamp.
///
/// Values carrying an offset are normalized to UTC; values without one
/// (`2024-05-01T10:00:00.123456`) are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(format!("invalid timestamp {:?}", raw))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
