//! Subscriptions
//!
//! # API Endpoints
//! - `GET /api/users/:id/subscriptions`
//! - `POST /api/users/:id/subscriptions`
//! - `DELETE /api/subscriptions/:id`
//!
//! Plan names and expiry strings are forwarded exactly as given.

use crate::api::client::AdminClient;
use crate::api::diff::Identified;
use crate::api::timestamp::parse_timestamp;
use crate::error::Result;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub plan: String,
    pub expires_at: String,
    pub created_at: String,
}

impl Subscription {
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.expires_at)
    }

    /// Whether the subscription is still running at `now`.
    ///
    /// `None` when the expiry is not a timestamp this client understands.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> Option<bool> {
        self.expires_at_utc().map(|expires| expires > now)
    }
}

impl Identified for Subscription {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Plan and expiry for a new subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub plan: String,
    pub expires_at: String,
}

impl NewSubscription {
    pub fn new(plan: impl Into<String>, expires_at: impl Into<String>) -> Self {
        Self {
            plan: plan.into(),
            expires_at: expires_at.into(),
        }
    }

    /// Use a typed expiry, formatted the way the backend stores timestamps.
    pub fn expiring_at(plan: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self::new(plan, expires_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

impl AdminClient {
    /// # Errors
    /// Returns error if the call fails
    pub async fn list_subscriptions(&self, user_id: i64) -> Result<Vec<Subscription>> {
        self.get_json(&format!("/api/users/{user_id}/subscriptions"))
            .await
    }

    /// # Errors
    /// Returns error if the call fails or the backend rejects the plan/expiry
    pub async fn create_subscription(
        &self,
        user_id: i64,
        subscription: &NewSubscription,
    ) -> Result<Subscription> {
        self.send_json(
            Method::POST,
            &format!("/api/users/{user_id}/subscriptions"),
            subscription,
        )
        .await
    }

    /// # Errors
    /// Returns error if the call fails
    pub async fn delete_subscription(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/subscriptions/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_new_subscription_wire_shape() {
        let sub = NewSubscription::new("yearly", "2026-06-01T00:00:00Z");
        assert_eq!(
            serde_json::to_value(&sub).unwrap(),
            json!({"plan": "yearly", "expiresAt": "2026-06-01T00:00:00Z"})
        );
    }

    #[test]
    fn test_expiring_at_formats_rfc3339() {
        let at = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let sub = NewSubscription::expiring_at("monthly", at);
        assert_eq!(sub.expires_at, "2026-06-01T00:00:00Z");
    }

    #[test]
    fn test_is_active_at() {
        let sub: Subscription = serde_json::from_value(json!({
            "id": 1,
            "userId": 2,
            "plan": "monthly",
            "expiresAt": "2026-01-01T00:00:00Z",
            "createdAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        let before = Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(sub.is_active_at(before), Some(true));
        assert_eq!(sub.is_active_at(after), Some(false));

        let odd = Subscription {
            expires_at: "next year".to_string(),
            ..sub
        };
        assert_eq!(odd.is_active_at(before), None);
    }
}
