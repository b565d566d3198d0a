//! MongoDB connection wrapper.

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::info;

use worknear_models::{Post, Worker};

use crate::error::DbResult;

const WORKERS_COLLECTION: &str = "workers";
const POSTS_COLLECTION: &str = "posts";

/// Handle to the WorkNear database.
///
/// Opened once at startup and injected into the repositories; cheap to clone.
#[derive(Clone)]
pub struct MongoDb {
    client: Client,
    db: Database,
}

impl MongoDb {
    /// Connect to MongoDB and select the application database.
    pub async fn connect(uri: &str, database: &str) -> DbResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        info!("Connected to MongoDB database: {}", database);
        Ok(Self { client, db })
    }

    /// Underlying client, needed to start sessions for transactional writes.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn workers(&self) -> Collection<Worker> {
        self.db.collection(WORKERS_COLLECTION)
    }

    pub fn posts(&self) -> Collection<Post> {
        self.db.collection(POSTS_COLLECTION)
    }

    /// Create the indexes the queries depend on.
    ///
    /// The unique phone index backs the registration uniqueness check; the
    /// 2dsphere index is required for `$near` proximity search.
    pub async fn ensure_indexes(&self) -> DbResult<()> {
        self.workers()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "phone": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;

        self.workers()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "location": "2dsphere" })
                    .build(),
            )
            .await?;

        self.posts()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "worker_id": 1, "created_at": -1 })
                    .build(),
            )
            .await?;

        info!("Database indexes ensured");
        Ok(())
    }

    /// Connectivity check for the readiness probe.
    pub async fn ping(&self) -> DbResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
