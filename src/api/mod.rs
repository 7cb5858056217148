//! MQL Manager admin API client
//!
//! Typed operations over the backend's `/api` surface. [`client`] holds the
//! transport, configuration and request executor; every other module adds the
//! operations for one resource family as an `impl AdminClient` block.
//!
//! # Modules
//! - `users`, `subscriptions`, `playlists`, `channels`, `packages` - resource CRUD
//! - `associations` - replace-whole-set user/package/channel links
//! - `diff` - set arithmetic for previewing a replacement
//! - `health`, `presence` - probes and read-only status
//! - `overview` - concurrent reads for a user detail view

pub mod associations;
pub mod channels;
pub mod client;
pub mod diff;
pub mod health;
pub mod overview;
pub mod packages;
pub mod playlists;
pub mod presence;
pub mod subscriptions;
pub mod timestamp;
pub mod users;

// Re-export commonly used types
pub use channels::{Channel, ChannelQuery};
pub use client::{AdminClient, ClientConfig, RequestBody, ResponseBody};
pub use diff::{ids_of, AssociationDiff, Identified};
pub use health::{AuthMode, Health};
pub use overview::UserOverview;
pub use packages::{NewPackage, Package};
pub use playlists::{NewPlaylistFromUrl, Playlist, PlaylistUpload, ReimportOutcome, SourceType};
pub use presence::{PresenceEntry, PresenceQuery, PresenceReport};
pub use subscriptions::{NewSubscription, Subscription};
pub use users::{Ack, CreateUserRequest, UpdateUserRequest, User};
