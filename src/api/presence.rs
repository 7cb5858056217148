//! Device presence
//!
//! Player apps report what they are watching; admins read it back here.
//!
//! # API Endpoint
//! `GET /api/presence?all=1&limit=100`
//!
//! Without `all` the backend returns only users seen in its recent window.

use crate::api::client::AdminClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    /// `online` or `offline`
    pub status: String,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub channel_url: Option<String>,
    pub last_seen_at: String,
    pub updated_at: String,
}

impl PresenceEntry {
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceReport {
    pub ok: bool,
    /// Oldest `lastSeenAt` still counted as online.
    pub cutoff: String,
    pub items: Vec<PresenceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceQuery {
    /// Include users outside the online window.
    pub all: bool,
    pub limit: Option<u32>,
}

impl PresenceQuery {
    pub fn path(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if self.all {
            serializer.append_pair("all", "1");
        }
        if let Some(limit) = self.limit {
            serializer.append_pair("limit", &limit.to_string());
        }
        let qs = serializer.finish();
        if qs.is_empty() {
            "/api/presence".to_string()
        } else {
            format!("/api/presence?{qs}")
        }
    }
}

impl AdminClient {
    /// # Errors
    /// Returns error if the call fails
    pub async fn list_presence(&self, query: &PresenceQuery) -> Result<PresenceReport> {
        self.get_json(&query.path()).await
    }
}
