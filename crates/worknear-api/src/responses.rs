//! Wire representations of workers and posts.
//!
//! Documents never serialize straight onto the wire: the worker DTOs rebuild
//! the record without the password hash, ids become hex strings, and
//! timestamps become RFC 3339.

use serde::Serialize;

use worknear_models::{GeoPoint, Post, Worker};

/// Worker record as returned by login and availability updates.
/// Post references stay as ids.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub category: String,
    pub is_available: bool,
    pub location: GeoPoint,
    pub posts: Vec<String>,
    pub created_at: String,
}

impl From<Worker> for WorkerResponse {
    fn from(worker: Worker) -> Self {
        Self {
            id: worker.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: worker.name,
            phone: worker.phone,
            address: worker.address,
            category: worker.category,
            is_available: worker.is_available,
            location: worker.location,
            posts: worker.posts.iter().map(|id| id.to_hex()).collect(),
            created_at: format_timestamp(worker.created_at),
        }
    }
}

/// Worker record in search results, with post references resolved to full
/// post records.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchWorkerResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub category: String,
    pub is_available: bool,
    pub location: GeoPoint,
    pub posts: Vec<PostResponse>,
    pub created_at: String,
}

impl SearchWorkerResponse {
    pub fn new(worker: Worker, posts: Vec<Post>) -> Self {
        Self {
            id: worker.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: worker.name,
            phone: worker.phone,
            address: worker.address,
            category: worker.category,
            is_available: worker.is_available,
            location: worker.location,
            posts: posts.into_iter().map(PostResponse::from).collect(),
            created_at: format_timestamp(worker.created_at),
        }
    }
}

/// Post record as returned by search and post listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub worker_id: String,
    pub text: String,
    /// Stored path under the static upload prefix, or null.
    pub image: Option<String>,
    pub created_at: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.map(|id| id.to_hex()).unwrap_or_default(),
            worker_id: post.worker_id.to_hex(),
            text: post.text,
            image: post.image,
            created_at: format_timestamp(post.created_at),
        }
    }
}

fn format_timestamp(ts: mongodb::bson::DateTime) -> String {
    ts.try_to_rfc3339_string().unwrap_or_default()
}
