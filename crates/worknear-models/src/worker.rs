//! Worker document model.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Normalize a service category for storage and matching.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// A worker document as stored in the `workers` collection.
///
/// `phone` is unique across all workers (unique index). `password` holds the
/// Argon2 hash and must never reach an API response; response DTOs in the API
/// crate rebuild the record without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub phone: String,
    pub password: String,
    pub address: String,
    pub category: String,
    #[serde(default)]
    pub is_available: bool,
    pub location: GeoPoint,
    #[serde(default)]
    pub posts: Vec<ObjectId>,
    pub created_at: DateTime,
}

impl Worker {
    /// Build a new worker ready for insertion.
    ///
    /// Normalizes the category, defaults availability to false, and stamps
    /// the creation time. `password` must already be hashed by the caller.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        password_hash: impl Into<String>,
        address: impl Into<String>,
        category: &str,
        location: GeoPoint,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            phone: phone.into(),
            password: password_hash.into(),
            address: address.into(),
            category: normalize_category(category),
            is_available: false,
            location,
            posts: Vec::new(),
            created_at: DateTime::now(),
        }
    }
}
