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


//! Admin API client and request executor
//!
//! [`AdminClient`] owns the HTTP transport, the backend base URL and the
//! session's [`CredentialStore`]. Every resource operation in the sibling
//! modules is an `impl AdminClient` block that funnels into
//! [`AdminClient::execute`].
//!
//! # Request negotiation
//! - `Accept: application/json` is always sent
//! - JSON bodies get `Content-Type: application/json`
//! - multipart bodies are passed through; the transport writes the
//!   `multipart/form-data` boundary header itself
//! - `Authorization: Bearer <token>` only when the session holds a token
//!
//! # Response classification
//! The body is classified once into a [`ResponseBody`]. A non-2xx status
//! becomes [`AdminError::Api`]; its message is the JSON `error` field, the
//! plain-text body, or [`crate::error::FALLBACK_API_MESSAGE`].
//!
//! No timeout is configured on the transport: a hung backend call hangs the
//! calling operation.

use crate::auth::{Credential, CredentialStore};
use crate::error::{AdminError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use url::Url;

/// Backend address used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

pub const DEFAULT_USER_AGENT: &str = concat!("mqlm-admin/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Client configuration
///
/// Environment variables read by [`ClientConfig::from_env`]:
///
/// | Variable | Field |
/// |---|---|
/// | `MQLM_API_URL` | `base_url` |
/// | `MQLM_USER_AGENT` | `user_agent` |
/// | `MQLM_CREDENTIAL_FILE` | `credential_file` |
/// | `MQLM_ADMIN_TOKEN` | `admin_token` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin, e.g. `https://tv.example.com`. `/api/...` paths are appended.
    pub base_url: String,

    pub user_agent: String,

    /// Persist the session credential here; `None` keeps it in memory only.
    pub credential_file: Option<PathBuf>,

    /// Credential applied when the session is opened.
    pub admin_token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        if let Some(base_url) = get("MQLM_API_URL") {
            config.base_url = base_url;
        }
        if let Some(user_agent) = get("MQLM_USER_AGENT") {
            config.user_agent = user_agent;
        }
        config.credential_file = get("MQLM_CREDENTIAL_FILE").map(PathBuf::from);
        config.admin_token = get("MQLM_ADMIN_TOKEN");
        config
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_credential_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_file = Some(path.into());
        self
    }

    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    /// `InvalidConfig` when the URL does not parse or is not http(s).
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AdminError::InvalidConfig(format!(
                "unsupported URL scheme '{other}' in {}",
                self.base_url
            ))),
        }
    }

    /// Open the session credential store this configuration describes.
    ///
    /// A configured `admin_token` replaces whatever the store held.
    ///
    /// # Errors
    /// Propagates credential file read/parse/write failures.
    pub fn open_credential_store(&self) -> Result<CredentialStore> {
        let store = match &self.credential_file {
            Some(path) => CredentialStore::persistent(path)?,
            None => CredentialStore::in_memory(),
        };
        if let Some(token) = &self.admin_token {
            store.set_credential(Some(token))?;
        }
        Ok(store)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            credential_file: None,
            admin_token: None,
        }
    }
}

// ============================================================================
// REQUEST / RESPONSE BODIES
// ============================================================================

/// Outbound request body
pub enum RequestBody {
    None,
    Json(Value),
    /// Sent as-is; used only for playlist file upload.
    Multipart(Form),
}

impl RequestBody {
    /// Serialize any value into a JSON body.
    ///
    /// # Errors
    /// `Json` when the value cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(body)?))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Json(_) => "json",
            Self::Multipart(_) => "multipart",
        }
    }
}

/// Response body, classified once by content type
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    /// Zero-length (or whitespace-only) body, e.g. `204 No Content`.
    Empty,
}

impl ResponseBody {
    /// Classify a raw body using the response `Content-Type`.
    ///
    /// A JSON content type whose body fails to parse is kept as text so the
    /// backend's words still reach the caller.
    pub fn classify(content_type: Option<&str>, raw: String) -> Self {
        if raw.trim().is_empty() {
            return Self::Empty;
        }

        let is_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false);

        if is_json {
            match serde_json::from_str(&raw) {
                Ok(value) => Self::Json(value),
                Err(e) => {
                    tracing::debug!("Body labelled JSON did not parse ({e}); keeping text");
                    Self::Text(raw)
                }
            }
        } else {
            Self::Text(raw)
        }
    }

    /// Error message carried by a failed response, if any.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Json(value) => value
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string),
            Self::Text(text) => Some(strip_line_ending(text).to_string()),
            Self::Empty => None,
        }
    }

    /// Decode into the operation's declared shape.
    ///
    /// # Errors
    /// `UnexpectedResponse` when the body is text, or JSON of the wrong shape.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let value = match self {
            Self::Json(value) => value,
            Self::Empty => Value::Null,
            Self::Text(text) => {
                return Err(AdminError::UnexpectedResponse(format!(
                    "expected a JSON body, got text: {}",
                    truncate(&text, 120)
                )))
            }
        };
        serde_json::from_value(value)
            .map_err(|e| AdminError::UnexpectedResponse(format!("response shape mismatch: {e}")))
    }
}

/// Drop the single line ending a text error body usually ends with.
fn strip_line_ending(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

// ============================================================================
// CLIENT
// ============================================================================

/// Typed client for the backend `/api` surface
///
/// Cloning is cheap and shares both the connection pool and the session.
#[derive(Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
    session: CredentialStore,
}

impl AdminClient {
    /// Create a client for one session.
    ///
    /// # Errors
    /// `InvalidConfig` for a bad base URL or when the transport cannot be built.
    pub fn new(config: &ClientConfig, session: CredentialStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AdminError::InvalidConfig(format!("HTTP client: {e}")))?;
        Self::with_http_client(http, config, session)
    }

    /// Create a client and open the session store described by `config`.
    ///
    /// # Errors
    /// See [`AdminClient::new`] and [`ClientConfig::open_credential_store`].
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let session = config.open_credential_store()?;
        Self::new(config, session)
    }

    /// Create a client on a caller-provided transport.
    ///
    /// # Errors
    /// `InvalidConfig` for a bad base URL.
    pub fn with_http_client(
        http: reqwest::Client,
        config: &ClientConfig,
        session: CredentialStore,
    ) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &CredentialStore {
        &self.session
    }

    /// Absolute URL for a backend-relative path such as `/api/users`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Perform one HTTP call and classify its outcome.
    ///
    /// The credential is read once, before the request is built.
    ///
    /// # Errors
    /// - `Network` - no response was received
    /// - `Api` - the backend answered with a non-2xx status
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<ResponseBody> {
        let credential: Credential = self.session.snapshot();
        let url = self.endpoint(path);

        tracing::debug!(
            %method,
            path,
            body = body.kind(),
            authenticated = credential.bearer_token().is_some(),
            "Admin API request"
        );

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");

        if let Some(token) = credential.bearer_token() {
            request = request.bearer_auth(token);
        }

        request = match body {
            RequestBody::None => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let raw = response.text().await?;
        let body = ResponseBody::classify(content_type.as_deref(), raw);

        tracing::debug!(%method, path, status = status.as_u16(), "Admin API response");

        if !status.is_success() {
            let err = AdminError::api(status.as_u16(), body.error_message());
            tracing::warn!(%method, path, status = status.as_u16(), error = %err, "Admin API call failed");
            return Err(err);
        }

        Ok(body)
    }

    /// [`AdminClient::execute`] and decode the success body into `T`.
    ///
    /// # Errors
    /// As `execute`, plus `UnexpectedResponse` when the body is text or has
    /// the wrong shape.
    pub async fn execute_typed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<T> {
        self.execute(method, path, body).await?.decode()
    }

    /// [`AdminClient::execute`] for calls whose success body is ignored.
    ///
    /// # Errors
    /// As `execute`.
    pub async fn execute_unit(&self, method: Method, path: &str, body: RequestBody) -> Result<()> {
        self.execute(method, path, body).await.map(|_| ())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute_typed(Method::GET, path, RequestBody::None).await
    }

    pub(crate) async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute_typed(method, path, RequestBody::json(body)?)
            .await
    }

    pub(crate) async fn post_without_body<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute_typed(Method::POST, path, RequestBody::None)
            .await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        self.execute_typed(Method::POST, path, RequestBody::Multipart(form))
            .await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute_unit(Method::DELETE, path, RequestBody::None)
            .await
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
