//! Backend timestamp helpers
//!
//! The backend formats `createdAt`/`expiresAt` as RFC 3339 strings. Entities
//! keep the raw string; these helpers parse it on demand and never fail loudly.

use chrono::{DateTime, Utc};

/// Parse a backend timestamp, returning `None` for anything not RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
