//! Channel packages
//!
//! # API Endpoints
//! - `GET /api/packages`
//! - `POST /api/packages`
//! - `GET /api/packages/:id`
//! - `DELETE /api/packages/:id`
//!
//! Package channel sets are in [`crate::api::associations`].

use crate::api::client::AdminClient;
use crate::api::diff::Identified;
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: i64,
    pub name: String,
    /// Whole currency units. The backend rejects negative values.
    pub price: i64,
    pub created_at: String,
}

impl Identified for Package {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPackage {
    pub name: String,
    pub price: i64,
}

impl NewPackage {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

impl AdminClient {
    /// # Errors
    /// Returns error if the call fails
    pub async fn list_packages(&self) -> Result<Vec<Package>> {
        self.get_json("/api/packages").await
    }

    /// # Errors
    /// Returns error if the call fails or the backend rejects the package
    pub async fn create_package(&self, package: &NewPackage) -> Result<Package> {
        self.send_json(Method::POST, "/api/packages", package).await
    }

    /// # Errors
    /// Returns error if the call fails, including not-found
    pub async fn get_package(&self, id: i64) -> Result<Package> {
        self.get_json(&format!("/api/packages/{id}")).await
    }

    /// # Errors
    /// Returns error if the call fails
    pub async fn delete_package(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/packages/{id}")).await
    }
}
