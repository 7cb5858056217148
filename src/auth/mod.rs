//! Admin credential handling
//!
//! The backend is protected by a single opaque bearer credential. This module
//! models the three states a session can be in and the store that carries that
//! state across calls (and, optionally, across process restarts).
//!
//! Nothing here talks to the network. The executor in [`crate::api::client`]
//! takes a [`Credential`] snapshot from the store once per outbound call.

pub mod credential;
pub mod store;

pub use credential::Credential;
pub use store::CredentialStore;
