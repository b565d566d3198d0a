//! Typed repository for post documents.

use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::doc;
use mongodb::{ClientSession, Collection};
use tracing::info;

use worknear_models::Post;

use crate::client::MongoDb;
use crate::error::{DbError, DbResult};

/// Repository for the `posts` collection.
#[derive(Clone)]
pub struct PostRepository {
    collection: Collection<Post>,
}

impl PostRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.posts(),
        }
    }

    /// Insert a post inside the caller's session so the write shares the
    /// transaction with the owning worker's reference-list update.
    pub async fn insert(&self, post: &Post, session: &mut ClientSession) -> DbResult<ObjectId> {
        let result = self.collection.insert_one(post).session(session).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or(DbError::UnexpectedInsertId)?;
        info!("Created post {}", id);
        Ok(id)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DbResult<Option<Post>> {
        let post = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(post)
    }

    /// All posts authored by a worker, newest first.
    pub async fn list_by_worker(&self, worker_id: ObjectId) -> DbResult<Vec<Post>> {
        let cursor = self
            .collection
            .find(doc! { "worker_id": worker_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        let posts = cursor.try_collect().await?;
        Ok(posts)
    }

    /// Resolve a worker's post references to full records, preserving the
    /// reference-list order (`$in` returns documents in arbitrary order).
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> DbResult<Vec<Post>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids } })
            .await?;
        let posts: Vec<Post> = cursor.try_collect().await?;
        Ok(order_by_ids(posts, ids))
    }

    /// Delete a post inside the caller's session. Returns false if no post
    /// matched.
    pub async fn delete(&self, id: ObjectId, session: &mut ClientSession) -> DbResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .session(session)
            .await?;
        Ok(result.deleted_count > 0)
    }
}

fn order_by_ids(mut posts: Vec<Post>, ids: &[ObjectId]) -> Vec<Post> {
    let mut ordered = Vec::with_capacity(posts.len());
    for id in ids {
        if let Some(pos) = posts.iter().position(|p| p.id == Some(*id)) {
            ordered.push(posts.swap_remove(pos));
        }
    }
    // Dangling references resolve to nothing; any unreferenced leftovers are
    // dropped rather than appended out of order.
    ordered
}
