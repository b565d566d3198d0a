//! Post lifecycle service.
//!
//! Posts live in their own collection while each worker document carries an
//! ordered list of post ids. Creating or deleting a post is therefore a dual
//! write, and both writes run in one MongoDB session. When transactions are
//! enabled (the default; requires a replica set) the session wraps them in a
//! transaction, otherwise they run sequentially on the same session.

use mongodb::bson::oid::ObjectId;
use mongodb::ClientSession;
use tracing::warn;

use worknear_db::{DbError, MongoDb, PostRepository, WorkerRepository};
use worknear_models::Post;
use worknear_storage::MediaStore;

use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Service for creating and deleting posts.
#[derive(Clone)]
pub struct PostService {
    db: MongoDb,
    workers: WorkerRepository,
    posts: PostRepository,
    media: MediaStore,
    transactions: bool,
}

impl PostService {
    pub fn new(
        db: MongoDb,
        workers: WorkerRepository,
        posts: PostRepository,
        media: MediaStore,
        transactions: bool,
    ) -> Self {
        Self {
            db,
            workers,
            posts,
            media,
            transactions,
        }
    }

    /// Create a post for a worker, optionally storing an uploaded image.
    ///
    /// The image file is written first; if the database writes then fail the
    /// stored file is removed again so no orphan files accumulate.
    pub async fn create_post(
        &self,
        worker_id: ObjectId,
        text: &str,
        image: Option<(Vec<u8>, Option<String>)>,
    ) -> ApiResult<Post> {
        let image_key = match image {
            Some((data, original_name)) => {
                Some(self.media.save(&data, original_name.as_deref()).await?)
            }
            None => None,
        };

        let mut post = Post::new(worker_id, text, image_key.clone());

        let result = self.insert_post(&mut post, worker_id).await;
        if result.is_err() {
            if let Some(key) = &image_key {
                if let Err(e) = self.media.remove(key).await {
                    warn!("Failed to clean up image {} after aborted post: {}", key, e);
                }
            }
        }
        result?;

        metrics::record_post_created(post.image.is_some());
        Ok(post)
    }

    async fn insert_post(&self, post: &mut Post, worker_id: ObjectId) -> ApiResult<()> {
        let mut session = self.start_session().await?;

        let outcome = async {
            let post_id = self.posts.insert(post, &mut session).await?;
            if !self.workers.push_post(worker_id, post_id, &mut session).await? {
                return Err(ApiError::not_found("Worker not found"));
            }
            post.id = Some(post_id);
            Ok(())
        }
        .await;

        self.finish_session(session, outcome).await
    }

    /// Delete a post and drop its reference from the worker's post list.
    ///
    /// The stored image, if any, is removed after the database writes commit;
    /// a failure there is logged but does not fail the request.
    pub async fn delete_post(&self, post_id: ObjectId, worker_id: ObjectId) -> ApiResult<()> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Post not found"))?;

        let mut session = self.start_session().await?;

        let outcome = async {
            if !self.posts.delete(post_id, &mut session).await? {
                return Err(ApiError::not_found("Post not found"));
            }
            self.workers.pull_post(worker_id, post_id, &mut session).await?;
            Ok(())
        }
        .await;

        self.finish_session(session, outcome).await?;

        if let Some(key) = &post.image {
            if let Err(e) = self.media.remove(key).await {
                warn!("Failed to remove image {} for deleted post: {}", key, e);
            }
        }

        metrics::record_post_deleted();
        Ok(())
    }

    async fn start_session(&self) -> ApiResult<ClientSession> {
        let mut session = self
            .db
            .client()
            .start_session()
            .await
            .map_err(DbError::from)?;
        if self.transactions {
            session.start_transaction().await.map_err(DbError::from)?;
        }
        Ok(session)
    }

    /// Commit on success, abort on failure. Abort errors are swallowed; the
    /// original failure is what the caller needs to see.
    async fn finish_session(
        &self,
        mut session: ClientSession,
        outcome: ApiResult<()>,
    ) -> ApiResult<()> {
        match outcome {
            Ok(()) => {
                if self.transactions {
                    session.commit_transaction().await.map_err(DbError::from)?;
                }
                Ok(())
            }
            Err(e) => {
                if self.transactions {
                    let _ = session.abort_transaction().await;
                }
                Err(e)
            }
        }
    }
}
