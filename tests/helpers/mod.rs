//! Test helpers for mock-backend integration tests
//!
//! Builds clients pointed at a `wiremock` server, canned entity JSON in the
//! backend's wire shape, and a stateful association backend that behaves like
//! the real replace-whole-set endpoints.

#![allow(dead_code)]

use mqlm_admin::{AdminClient, ClientConfig, Credential, CredentialStore};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-admin-token";
pub const CREATED_AT: &str = "2025-01-15T10:00:00Z";

/// Client for `server` using the given session
pub fn client_for(server: &MockServer, session: CredentialStore) -> AdminClient {
    AdminClient::new(&ClientConfig::new(server.uri()), session).expect("client should build")
}

/// Client holding [`TEST_TOKEN`]
pub fn token_client(server: &MockServer) -> AdminClient {
    client_for(
        server,
        CredentialStore::from_credential(Credential::Token(TEST_TOKEN.to_string())),
    )
}

pub fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "displayName": format!("{username} display"),
        "appKey": "k-123",
        "playlistId": null,
        "createdAt": CREATED_AT
    })
}

pub fn channel_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Channel {id}"),
        "streamUrl": format!("http://streams.example.com/{id}.m3u8"),
        "tvgId": format!("ch{id}"),
        "tvgName": format!("Channel {id}"),
        "tvgLogo": "",
        "groupTitle": "General",
        "createdAt": CREATED_AT
    })
}

pub fn package_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Package {id}"),
        "price": id * 100,
        "createdAt": CREATED_AT
    })
}

pub fn subscription_json(id: i64, user_id: i64) -> Value {
    json!({
        "id": id,
        "userId": user_id,
        "plan": "monthly",
        "expiresAt": "2026-01-15T10:00:00Z",
        "createdAt": CREATED_AT
    })
}

pub fn playlist_json(id: i64, source_type: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Playlist {id}"),
        "sourceType": source_type,
        "sourceUrl": if source_type == "url" { "http://example.com/list.m3u" } else { "" },
        "createdAt": CREATED_AT,
        "publicUrl": format!("/public/m3u/{id}.m3u")
    })
}

/// Header value of a received request, if present
pub fn header(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Stateful stand-in for one association endpoint
///
/// `GET` returns the current set, `PUT` replaces it with the ids found under
/// `field` in the JSON body and returns the new set. Entities are rendered with
/// `render`, sorted by id.
#[derive(Clone)]
pub struct AssociationBackend {
    ids: Arc<Mutex<BTreeSet<i64>>>,
    field: &'static str,
    render: fn(i64) -> Value,
}

impl AssociationBackend {
    pub fn new(field: &'static str, render: fn(i64) -> Value, initial: &[i64]) -> Self {
        Self {
            ids: Arc::new(Mutex::new(initial.iter().copied().collect())),
            field,
            render,
        }
    }

    pub fn current(&self) -> Vec<i64> {
        self.ids.lock().unwrap().iter().copied().collect()
    }

    fn rendered(&self) -> Value {
        Value::Array(self.current().into_iter().map(self.render).collect())
    }
}

impl Respond for AssociationBackend {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match request.method.as_str() {
            "GET" => ResponseTemplate::new(200).set_body_json(self.rendered()),
            "PUT" => {
                let body: Value = match serde_json::from_slice(&request.body) {
                    Ok(body) => body,
                    Err(_) => {
                        return ResponseTemplate::new(400)
                            .set_body_json(json!({"error": "invalid JSON"}))
                    }
                };
                let Some(ids) = body.get(self.field).and_then(Value::as_array) else {
                    return ResponseTemplate::new(400)
                        .set_body_json(json!({"error": format!("missing {}", self.field)}));
                };
                let replacement: BTreeSet<i64> = ids.iter().filter_map(Value::as_i64).collect();
                *self.ids.lock().unwrap() = replacement;
                ResponseTemplate::new(200).set_body_json(self.rendered())
            }
            _ => ResponseTemplate::new(405),
        }
    }
}
