//! Channels
//!
//! # API Endpoints
//! - `GET /api/channels?playlistId=&q=&limit=`
//!
//! Each filter becomes a query parameter only when it is set. A query with no
//! filters produces a bare `/api/channels` with no `?`.
//!
//! Per-user and per-package channel sets are in [`crate::api::associations`].

use crate::api::client::AdminClient;
use crate::api::diff::Identified;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Imported stream entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub stream_url: String,

    // TV-guide metadata; empty when the source M3U had none.
    #[serde(default)]
    pub tvg_id: String,
    #[serde(default)]
    pub tvg_name: String,
    #[serde(default)]
    pub tvg_logo: String,

    /// `group-title` label from the source playlist.
    #[serde(default)]
    pub group_title: String,

    pub created_at: String,
}

impl Identified for Channel {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Filters for [`AdminClient::list_channels`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelQuery {
    pub playlist_id: Option<i64>,
    /// Free-text search; blank counts as unset.
    pub q: Option<String>,
    /// Maximum rows; zero counts as unset.
    pub limit: Option<u32>,
}

impl ChannelQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playlist(mut self, playlist_id: i64) -> Self {
        self.playlist_id = Some(playlist_id);
        self
    }

    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Encoded query string without the leading `?`, or `None` when no filter is set.
    pub fn to_query_string(&self) -> Option<String> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut any = false;

        if let Some(playlist_id) = self.playlist_id {
            serializer.append_pair("playlistId", &playlist_id.to_string());
            any = true;
        }
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            serializer.append_pair("q", q);
            any = true;
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            serializer.append_pair("limit", &limit.to_string());
            any = true;
        }

        any.then(|| serializer.finish())
    }

    /// Request path including the query string, if any.
    pub fn path(&self) -> String {
        match self.to_query_string() {
            Some(qs) => format!("/api/channels?{qs}"),
            None => "/api/channels".to_string(),
        }
    }
}

impl AdminClient {
    /// List channels, optionally filtered.
    ///
    /// # Errors
    /// Returns error if the call fails
    pub async fn list_channels(&self, query: &ChannelQuery) -> Result<Vec<Channel>> {
        self.get_json(&query.path()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_with_all_filters() {
        let query = ChannelQuery::new().playlist(5).search("news").limit(10);
        assert_eq!(
            query.to_query_string().as_deref(),
            Some("playlistId=5&q=news&limit=10")
        );
        assert_eq!(query.path(), "/api/channels?playlistId=5&q=news&limit=10");
    }

    #[test]
    fn test_empty_query_has_no_query_string() {
        let query = ChannelQuery::default();
        assert_eq!(query.to_query_string(), None);
        assert_eq!(query.path(), "/api/channels");
    }

    #[test]
    fn test_blank_search_and_zero_limit_are_omitted() {
        let query = ChannelQuery {
            playlist_id: None,
            q: Some(String::new()),
            limit: Some(0),
        };
        assert_eq!(query.path(), "/api/channels");
    }

    #[test]
    fn test_search_is_percent_encoded() {
        let query = ChannelQuery::new().search("sky & sports");
        assert_eq!(query.path(), "/api/channels?q=sky+%26+sports");
    }

    #[test]
    fn test_channel_tolerates_missing_tvg_fields() {
        let channel: Channel = serde_json::from_value(serde_json::json!({
            "id": 9,
            "name": "News 24",
            "streamUrl": "http://example.com/news.m3u8",
            "createdAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(channel.tvg_logo.is_empty());
        assert!(channel.group_title.is_empty());
    }
}
