//! Typed repository for worker documents.

use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::ReturnDocument;
use mongodb::{ClientSession, Collection};
use tracing::info;

use worknear_models::{normalize_category, Worker};

use crate::client::MongoDb;
use crate::error::{is_duplicate_key, DbError, DbResult};

/// Repository for the `workers` collection.
#[derive(Clone)]
pub struct WorkerRepository {
    collection: Collection<Worker>,
}

impl WorkerRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.workers(),
        }
    }

    pub async fn find_by_phone(&self, phone: &str) -> DbResult<Option<Worker>> {
        let worker = self.collection.find_one(doc! { "phone": phone }).await?;
        Ok(worker)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DbResult<Option<Worker>> {
        let worker = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(worker)
    }

    /// Insert a new worker. A duplicate phone number maps to
    /// [`DbError::DuplicatePhone`] via the unique index.
    pub async fn insert(&self, worker: &Worker) -> DbResult<ObjectId> {
        let result = self.collection.insert_one(worker).await.map_err(|e| {
            if is_duplicate_key(&e) {
                DbError::DuplicatePhone
            } else {
                DbError::from(e)
            }
        })?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or(DbError::UnexpectedInsertId)?;
        info!("Registered worker {}", id);
        Ok(id)
    }

    /// Set the availability flag and return the updated document, or None if
    /// no worker matches.
    pub async fn set_availability(
        &self,
        id: ObjectId,
        is_available: bool,
    ) -> DbResult<Option<Worker>> {
        let worker = self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "is_available": is_available } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(worker)
    }

    /// Available workers in a category within `max_distance_meters` of the
    /// given point, nearest first.
    ///
    /// Ordering and distance computation come entirely from the 2dsphere
    /// index's `$near` semantics; nothing is computed application-side.
    pub async fn find_nearby(
        &self,
        category: &str,
        longitude: f64,
        latitude: f64,
        max_distance_meters: f64,
    ) -> DbResult<Vec<Worker>> {
        let filter = nearby_filter(category, longitude, latitude, max_distance_meters);
        let cursor = self.collection.find(filter).await?;
        let workers = cursor.try_collect().await?;
        Ok(workers)
    }

    /// Append a post reference to the worker's post list.
    /// Returns false if the worker does not exist.
    pub async fn push_post(
        &self,
        worker_id: ObjectId,
        post_id: ObjectId,
        session: &mut ClientSession,
    ) -> DbResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": worker_id },
                doc! { "$push": { "posts": post_id } },
            )
            .session(session)
            .await?;
        Ok(result.matched_count > 0)
    }

    /// Remove a post reference from the worker's post list.
    pub async fn pull_post(
        &self,
        worker_id: ObjectId,
        post_id: ObjectId,
        session: &mut ClientSession,
    ) -> DbResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": worker_id },
                doc! { "$pull": { "posts": post_id } },
            )
            .session(session)
            .await?;
        Ok(result.matched_count > 0)
    }
}

fn nearby_filter(
    category: &str,
    longitude: f64,
    latitude: f64,
    max_distance_meters: f64,
) -> Document {
    doc! {
        "category": normalize_category(category),
        "is_available": true,
        "location": {
            "$near": {
                "$geometry": {
                    "type": "Point",
                    "coordinates": [longitude, latitude],
                },
                "$maxDistance": max_distance_meters,
            }
        }
    }
}
