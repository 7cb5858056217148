//! User management
//!
//! # API Endpoints
//! - `GET /api/users` - list users
//! - `POST /api/users` - create a user, optionally with packages and a first subscription
//! - `GET /api/users/:id` - fetch one user
//! - `PUT /api/users/:id` - rename / change display name
//! - `DELETE /api/users/:id` - delete a user
//! - `PUT /api/users/:id/password` - set the device login password
//!
//! Playlist, channel and package assignment live in [`crate::api::associations`].

use crate::api::diff::Identified;
use crate::api::subscriptions::NewSubscription;
use crate::api::timestamp::parse_timestamp;
use crate::api::client::AdminClient;
use crate::error::Result;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};

/// Subscriber account as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    /// Unique; cannot be changed after creation on most deployments.
    pub username: String,

    pub display_name: String,

    /// Device key used by the player app to fetch its playlist.
    /// The backend sends `""` when none was issued; that is read as `None`.
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,

    #[serde(default)]
    pub playlist_id: Option<i64>,

    pub created_at: String,

    /// Package names, present on list responses of newer backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<String>>,

    /// Latest subscription expiry, present on list responses of newer backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl User {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        self.expires_at.as_deref().and_then(parse_timestamp)
    }
}

impl Identified for User {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Payload for `POST /api/users`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub display_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Initial package set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_ids: Option<Vec<i64>>,

    /// Subscription created together with the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<NewSubscription>,
}

impl CreateUserRequest {
    pub fn new(username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_packages(mut self, package_ids: impl IntoIterator<Item = i64>) -> Self {
        self.package_ids = Some(package_ids.into_iter().collect());
        self
    }

    pub fn with_subscription(mut self, subscription: NewSubscription) -> Self {
        self.subscription = Some(subscription);
        self
    }
}

/// Payload for `PUT /api/users/:id`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Bare acknowledgement body `{"ok": true}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

#[derive(Serialize)]
struct PasswordBody<'a> {
    password: &'a str,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

impl AdminClient {
    /// List all users, newest first.
    ///
    /// # Errors
    /// Returns error if the call fails or the body is not a user list
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json("/api/users").await
    }

    /// Create a user.
    ///
    /// Nothing is validated client-side; a blank username comes back as the
    /// backend's error message.
    ///
    /// # Errors
    /// Returns error if the call fails or the backend rejects the payload
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
        self.send_json(Method::POST, "/api/users", request).await
    }

    /// # Errors
    /// Returns error if the call fails, including not-found
    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.get_json(&format!("/api/users/{id}")).await
    }

    /// # Errors
    /// Returns error if the call fails or the backend rejects the change
    pub async fn update_user(&self, id: i64, request: &UpdateUserRequest) -> Result<User> {
        self.send_json(Method::PUT, &format!("/api/users/{id}"), request)
            .await
    }

    /// Delete a user.
    ///
    /// Deleting twice surfaces whatever the backend answers the second time;
    /// the client does not suppress it.
    ///
    /// # Errors
    /// Returns error if the call fails
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/users/{id}")).await
    }

    /// Set the password the player app logs in with.
    ///
    /// # Errors
    /// Returns error if the call fails or the backend rejects the password
    pub async fn set_user_password(&self, id: i64, password: &str) -> Result<Ack> {
        self.send_json(
            Method::PUT,
            &format!("/api/users/{id}/password"),
            &PasswordBody { password },
        )
        .await
    }
}
