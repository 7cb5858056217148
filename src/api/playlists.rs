//! Playlists
//!
//! # API Endpoints
//! - `GET /api/playlists`
//! - `POST /api/playlists` (JSON) - register a remote M3U by URL
//! - `POST /api/playlists` (multipart) - upload an M3U file, fields `name` + `file`
//! - `DELETE /api/playlists/:id`
//! - `POST /api/playlists/:id/reimport` - re-read the source and rebuild its channels
//!
//! Re-import runs to completion inside the request: the call returns only once
//! the backend has finished importing. Concurrent re-imports of one playlist are
//! whatever the backend makes of them; nothing here serializes them.

use crate::api::client::AdminClient;
use crate::api::diff::Identified;
use crate::api::timestamp::parse_timestamp;
use crate::error::Result;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Where a playlist's content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Fetched from `source_url`
    Url,
    /// Uploaded content stored by the backend
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub source_type: SourceType,

    /// Remote URL for `url` playlists; empty for uploads.
    #[serde(default)]
    pub source_url: String,

    pub created_at: String,

    /// Backend-relative path serving the playlist, e.g. `/public/m3u/3.m3u`.
    pub public_url: String,
}

impl Playlist {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

impl Identified for Playlist {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Payload for registering a playlist by URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPlaylistFromUrl {
    pub name: String,
    pub url: String,
}

impl NewPlaylistFromUrl {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// An M3U file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistUpload {
    /// Display name; the backend falls back to the file stem when blank.
    pub name: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl PlaylistUpload {
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Read an upload from disk, using the file's own name.
    ///
    /// # Errors
    /// `Io` when the file cannot be read
    pub async fn from_path(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "playlist.m3u".to_string());
        Ok(Self::new(name, file_name, content))
    }

    fn into_form(self) -> Form {
        let file = Part::bytes(self.content).file_name(self.file_name);
        Form::new().text("name", self.name).part("file", file)
    }
}

/// Result of `POST /api/playlists/:id/reimport`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReimportOutcome {
    pub ok: bool,
    /// Number of channels imported.
    pub imported: u64,
}

impl AdminClient {
    /// # Errors
    /// Returns error if the call fails
    pub async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        self.get_json("/api/playlists").await
    }

    /// Register a remote playlist; the backend imports its channels before answering.
    ///
    /// # Errors
    /// Returns error if the call fails or the backend cannot fetch the URL
    pub async fn create_playlist_from_url(&self, request: &NewPlaylistFromUrl) -> Result<Playlist> {
        self.send_json(Method::POST, "/api/playlists", request).await
    }

    /// Upload a playlist file as `multipart/form-data`.
    ///
    /// # Errors
    /// Returns error if the call fails or the backend rejects the file
    pub async fn upload_playlist(&self, upload: PlaylistUpload) -> Result<Playlist> {
        tracing::debug!(
            name = %upload.name,
            file = %upload.file_name,
            bytes = upload.content.len(),
            "Uploading playlist"
        );
        self.post_multipart("/api/playlists", upload.into_form())
            .await
    }

    /// # Errors
    /// Returns error if the call fails
    pub async fn delete_playlist(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/playlists/{id}")).await
    }

    /// Re-read a playlist's source and rebuild its channel list.
    ///
    /// # Errors
    /// Returns error if the call fails or the import fails on the backend
    pub async fn reimport_playlist(&self, id: i64) -> Result<ReimportOutcome> {
        let outcome: ReimportOutcome = self
            .post_without_body(&format!("/api/playlists/{id}/reimport"))
            .await?;
        tracing::info!(playlist_id = id, imported = outcome.imported, "Playlist re-imported");
        Ok(outcome)
    }

    /// Absolute URL of a playlist's public M3U on this client's backend.
    ///
    /// # Errors
    /// `InvalidConfig` when the backend path cannot be joined to the base URL
    pub fn playlist_public_url(&self, playlist: &Playlist) -> Result<Url> {
        Ok(Url::parse(&self.endpoint(&playlist.public_url))?)
    }
}
