//! Application state.

use worknear_db::{MongoDb, PostRepository, WorkerRepository};
use worknear_storage::MediaStore;

use crate::config::ApiConfig;
use crate::services::PostService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub db: MongoDb,
    pub workers: WorkerRepository,
    pub posts: PostRepository,
    pub media: MediaStore,
    pub post_service: PostService,
}

impl AppState {
    /// Create new application state.
    ///
    /// Connects to MongoDB, ensures the collection indexes exist, and opens
    /// the upload directory.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        crate::error::set_production_mode(config.is_production());

        let db = MongoDb::connect(&config.mongodb_uri, &config.mongodb_database).await?;
        db.ensure_indexes().await?;

        let workers = WorkerRepository::new(&db);
        let posts = PostRepository::new(&db);
        let media = MediaStore::new(config.upload_dir.as_str())?;

        let post_service = PostService::new(
            db.clone(),
            workers.clone(),
            posts.clone(),
            media.clone(),
            config.db_transactions,
        );

        Ok(Self {
            config,
            db,
            workers,
            posts,
            media,
            post_service,
        })
    }
}
