//! Typed admin client for the MQL Manager IPTV subscription backend.
//!
//! ```no_run
//! use mqlm_admin::{AdminClient, ClientConfig, CredentialStore};
//!
//! # async fn run() -> mqlm_admin::Result<()> {
//! let session = CredentialStore::in_memory();
//! session.set_credential(Some("admin-token"))?;
//!
//! let client = AdminClient::new(&ClientConfig::new("http://127.0.0.1:8080"), session)?;
//! let users = client.list_users().await?;
//! client.set_user_packages(users[0].id, &[1, 2]).await?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod error;
pub mod auth;
pub mod api;

// Re-export commonly used types for convenience
pub use error::{AdminError, Result};
pub use auth::{Credential, CredentialStore};
pub use api::{AdminClient, ClientConfig};
