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


//! Session-scoped credential store
//!
//! A [`CredentialStore`] is a cheap, cloneable handle to one session's
//! credential. It is handed to [`crate::api::AdminClient::new`] instead of
//! living in process-wide state, so two clients with two stores are two
//! independent sessions.
//!
//! # Persistence
//!
//! [`CredentialStore::in_memory`] never touches disk.
//! [`CredentialStore::persistent`] mirrors every change into a small JSON file:
//!
//! ```json
//! { "token": "..." }
//! ```
//!
//! - file missing → logged out
//! - `{"token": ""}` → no-auth mode
//! - `{"token": "abc"}` → bearer token `abc`
//!
//! A file that exists but cannot be parsed is reported as an error rather than
//! silently treated as a logout.

use crate::auth::credential::Credential;
use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// On-disk shape of the credential record
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    token: String,
}

struct Inner {
    state: RwLock<Credential>,
    file: Option<PathBuf>,
}

#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<Inner>,
}

impl CredentialStore {
    /// Create a store that starts logged out and is never persisted.
    pub fn in_memory() -> Self {
        Self::with_state(Credential::NoCredential, None)
    }

    /// Create an in-memory store seeded with a credential.
    ///
    /// The seed goes through [`Credential::normalized`], so a blank token
    /// starts the session logged out.
    pub fn from_credential(credential: Credential) -> Self {
        Self::with_state(credential.normalized(), None)
    }

    /// Open a store backed by a JSON file, loading any existing record.
    ///
    /// # Errors
    /// - `Io` - the file exists but could not be read
    /// - `CredentialStorage` - the file exists but is not a valid record
    pub fn persistent(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let credential = load_record(&path)?;
        tracing::debug!(path = %path.display(), state = %credential.masked(), "Loaded credential record");
        Ok(Self::with_state(credential, Some(path)))
    }

    fn with_state(credential: Credential, file: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(credential),
                file,
            }),
        }
    }

    /// Path of the backing file, if this store is persistent.
    pub fn file_path(&self) -> Option<&Path> {
        self.inner.file.as_deref()
    }

    /// Immutable copy of the current credential.
    ///
    /// The executor reads this once per call; changing the store afterwards
    /// does not affect a request that is already in flight.
    pub fn snapshot(&self) -> Credential {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current credential; same as [`CredentialStore::snapshot`].
    pub fn credential(&self) -> Credential {
        self.snapshot()
    }

    /// Stored credential value.
    ///
    /// `None` when logged out, `Some("")` in no-auth mode, the token otherwise.
    pub fn get_credential(&self) -> Option<String> {
        self.snapshot().as_stored().map(str::to_string)
    }

    /// Store a credential; `None` or a blank value removes the record.
    ///
    /// # Errors
    /// Only persistent stores can fail, when the record cannot be written.
    pub fn set_credential(&self, value: Option<&str>) -> Result<()> {
        self.replace(Credential::from_input(value))
    }

    /// Record that the operator chose to continue without a credential.
    ///
    /// # Errors
    /// Only persistent stores can fail, when the record cannot be written.
    pub fn mark_no_auth(&self) -> Result<()> {
        self.replace(Credential::NoAuthMode)
    }

    /// Enter no-auth mode only if the session is logged out.
    ///
    /// Returns whether the store changed. A token set concurrently through
    /// another handle is never overwritten.
    ///
    /// # Errors
    /// Only persistent stores can fail, when the record cannot be written.
    pub fn mark_no_auth_if_logged_out(&self) -> Result<bool> {
        self.replace_if(Credential::NoAuthMode, |current| !current.is_logged_in())
    }

    /// True iff a record exists, including the explicit no-auth record.
    pub fn is_logged_in(&self) -> bool {
        self.snapshot().is_logged_in()
    }

    /// Remove the record (log out).
    ///
    /// # Errors
    /// Only persistent stores can fail, when the record cannot be removed.
    pub fn clear(&self) -> Result<()> {
        self.replace(Credential::NoCredential)
    }

    fn replace(&self, credential: Credential) -> Result<()> {
        self.replace_if(credential, |_| true).map(|_| ())
    }

    /// Swap in `credential` when `accept` approves the current value.
    ///
    /// The check and the write happen under one write guard.
    fn replace_if<F>(&self, credential: Credential, accept: F) -> Result<bool>
    where
        F: FnOnce(&Credential) -> bool,
    {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if !accept(&state) {
            return Ok(false);
        }

        // Disk first; a failed write leaves the in-memory state unchanged.
        if let Some(path) = &self.inner.file {
            save_record(path, &credential)?;
        }

        if *state != credential {
            tracing::info!(from = %state.masked(), to = %credential.masked(), "Admin credential changed");
        }
        *state = credential;
        Ok(true)
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("state", &self.snapshot())
            .field("file", &self.inner.file)
            .finish()
    }
}

fn load_record(path: &Path) -> Result<Credential> {
    if !path.exists() {
        return Ok(Credential::NoCredential);
    }

    let json = fs::read_to_string(path)?;
    let record: StoredRecord = serde_json::from_str(&json).map_err(|e| {
        AdminError::CredentialStorage(format!("{}: {}", path.display(), e))
    })?;
    Ok(Credential::from_stored(Some(record.token)))
}

fn save_record(path: &Path, credential: &Credential) -> Result<()> {
    match credential.as_stored() {
        None => {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Some(token) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let record = StoredRecord {
                token: token.to_string(),
            };
            fs::write(path, serde_json::to_string_pretty(&record)?)?;
        }
    }
    Ok(())
}
