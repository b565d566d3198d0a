//! Post document model.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// A post document as stored in the `posts` collection.
///
/// Posts belong to exactly one worker. The relationship is kept redundantly:
/// `worker_id` here, and the post's id in the owning worker's `posts` array.
/// Mutations that touch both sides go through the API crate's `PostService`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub worker_id: ObjectId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime,
}

impl Post {
    /// Build a new post ready for insertion, stamped with the current time.
    pub fn new(worker_id: ObjectId, text: impl Into<String>, image: Option<String>) -> Self {
        Self {
            id: None,
            worker_id,
            text: text.into(),
            image,
            created_at: DateTime::now(),
        }
    }
}
