//! Health probe and auth-mode detection
//!
//! # API Endpoint
//! `GET /api/health` → `{"ok": true, "time": "...", "authRequired": false}`
//!
//! `authRequired` is optional; older backends omit it.

use crate::api::client::AdminClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub ok: bool,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_required: Option<bool>,
}

/// What the backend says about authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// A bearer credential is needed.
    Required,
    /// The backend accepts unauthenticated admin calls.
    NotRequired,
    /// The backend did not say; treat as [`AuthMode::Required`] when prompting.
    Unreported,
}

impl AuthMode {
    pub fn from_health(health: &Health) -> Self {
        match health.auth_required {
            Some(true) => Self::Required,
            Some(false) => Self::NotRequired,
            None => Self::Unreported,
        }
    }

    /// Whether a consumer should ask the operator for a credential.
    pub fn needs_credential(self) -> bool {
        !matches!(self, Self::NotRequired)
    }
}

impl AdminClient {
    /// # Errors
    /// Returns error if the call fails
    pub async fn health(&self) -> Result<Health> {
        self.get_json("/api/health").await
    }

    /// Probe the backend and, when it runs without auth, put a logged-out
    /// session into no-auth mode.
    ///
    /// A session that already holds a token, or is already in no-auth mode,
    /// is left alone.
    ///
    /// # Errors
    /// Returns error if the probe fails or the session cannot be updated
    pub async fn detect_auth_mode(&self) -> Result<AuthMode> {
        let health = self.health().await?;
        let mode = AuthMode::from_health(&health);

        if mode == AuthMode::NotRequired && self.session().mark_no_auth_if_logged_out()? {
            tracing::info!("Backend reports no auth required; continuing without a credential");
        }

        Ok(mode)
    }
}
