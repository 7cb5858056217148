// MQL Manager Admin - typed client for the MQL Manager backend
// Copyright (C) 2025 MQL Manager contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! User / Package / Channel associations
//!
//! Every setter here **replaces the whole set**: the ids submitted become the
//! complete association and anything not listed is dropped. There is no
//! add-one or remove-one call. Submitting the same set twice is harmless.
//!
//! Setters answer with the authoritative post-update value, so no follow-up
//! read is needed.
//!
//! A user's effective channel list is its direct channels plus the channels of
//! every package it holds. That union is the backend's business; the two sets
//! are exposed independently here.
//!
//! # API Endpoints
//! - `PUT /api/users/:id/playlist` - body `{"playlistId": n | null}`, returns the user
//! - `GET|PUT /api/users/:id/channels` - body `{"channelIds": [...]}`
//! - `GET|PUT /api/users/:id/packages` - body `{"packageIds": [...]}`
//! - `GET|PUT /api/packages/:id/channels` - body `{"channelIds": [...]}`

use crate::api::channels::Channel;
use crate::api::client::AdminClient;
use crate::api::diff::AssociationDiff;
use crate::api::packages::Package;
use crate::api::users::User;
use crate::error::Result;
use reqwest::Method;
use serde::Serialize;

// ============================================================================
// REQUEST BODIES
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistAssignment {
    // Serialized as `null` when clearing; never skipped.
    playlist_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSet<'a> {
    channel_ids: &'a [i64],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageSet<'a> {
    package_ids: &'a [i64],
}

// ============================================================================
// OPERATIONS
// ============================================================================

impl AdminClient {
    /// Assign a playlist to a user, or clear it with `None`.
    ///
    /// # Returns
    /// The user as stored after the change
    ///
    /// # Errors
    /// Returns error if the call fails
    pub async fn set_user_playlist(&self, user_id: i64, playlist_id: Option<i64>) -> Result<User> {
        self.send_json(
            Method::PUT,
            &format!("/api/users/{user_id}/playlist"),
            &PlaylistAssignment { playlist_id },
        )
        .await
    }

    /// Channels assigned directly to a user (not via packages).
    ///
    /// # Errors
    /// Returns error if the call fails
    pub async fn get_user_channels(&self, user_id: i64) -> Result<Vec<Channel>> {
        self.get_json(&format!("/api/users/{user_id}/channels"))
            .await
    }

    /// Replace a user's direct channel set.
    ///
    /// # Returns
    /// The user's channel set after the replacement
    ///
    /// # Errors
    /// Returns error if the call fails
    pub async fn set_user_channels(&self, user_id: i64, channel_ids: &[i64]) -> Result<Vec<Channel>> {
        tracing::debug!(user_id, count = channel_ids.len(), "Replacing user channels");
        self.send_json(
            Method::PUT,
            &format!("/api/users/{user_id}/channels"),
            &ChannelSet { channel_ids },
        )
        .await
    }

    /// # Errors
    /// Returns error if the call fails
    pub async fn get_user_packages(&self, user_id: i64) -> Result<Vec<Package>> {
        self.get_json(&format!("/api/users/{user_id}/packages"))
            .await
    }

    /// Replace a user's package set.
    ///
    /// # Returns
    /// The user's packages after the replacement
    ///
    /// # Errors
    /// Returns error if the call fails
    pub async fn set_user_packages(&self, user_id: i64, package_ids: &[i64]) -> Result<Vec<Package>> {
        tracing::debug!(user_id, count = package_ids.len(), "Replacing user packages");
        self.send_json(
            Method::PUT,
            &format!("/api/users/{user_id}/packages"),
            &PackageSet { package_ids },
        )
        .await
    }

    /// # Errors
    /// Returns error if the call fails
    pub async fn get_package_channels(&self, package_id: i64) -> Result<Vec<Channel>> {
        self.get_json(&format!("/api/packages/{package_id}/channels"))
            .await
    }

    /// Replace a package's channel set.
    ///
    /// # Returns
    /// The package's channels after the replacement
    ///
    /// # Errors
    /// Returns error if the call fails
    pub async fn set_package_channels(
        &self,
        package_id: i64,
        channel_ids: &[i64],
    ) -> Result<Vec<Channel>> {
        tracing::debug!(package_id, count = channel_ids.len(), "Replacing package channels");
        self.send_json(
            Method::PUT,
            &format!("/api/packages/{package_id}/channels"),
            &ChannelSet { channel_ids },
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Previews: read the current set and describe what a replacement would do.
    // ------------------------------------------------------------------------

    /// # Errors
    /// Returns error if reading the current set fails
    pub async fn preview_user_channels(&self, user_id: i64, desired: &[i64]) -> Result<AssociationDiff> {
        let current = self.get_user_channels(user_id).await?;
        Ok(AssociationDiff::from_entities(&current, desired))
    }

    /// # Errors
    /// Returns error if reading the current set fails
    pub async fn preview_user_packages(&self, user_id: i64, desired: &[i64]) -> Result<AssociationDiff> {
        let current = self.get_user_packages(user_id).await?;
        Ok(AssociationDiff::from_entities(&current, desired))
    }

    /// # Errors
    /// Returns error if reading the current set fails
    pub async fn preview_package_channels(
        &self,
        package_id: i64,
        desired: &[i64],
    ) -> Result<AssociationDiff> {
        let current = self.get_package_channels(package_id).await?;
        Ok(AssociationDiff::from_entities(&current, desired))
    }
}
