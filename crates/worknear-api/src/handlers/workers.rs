//! Worker availability and proximity search handlers.

use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::info;

use worknear_models::normalize_category;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::responses::{SearchWorkerResponse, WorkerResponse};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub worker_id: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub success: bool,
    pub message: String,
    pub worker: WorkerResponse,
}

/// Flip a worker's availability flag and return the updated record.
pub async fn set_availability(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<AvailabilityRequest>, ApiError>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let (Some(worker_id), Some(is_available)) = (req.worker_id, req.is_available) else {
        return Err(ApiError::validation("Invalid input"));
    };
    let worker_id = ObjectId::parse_str(&worker_id)
        .map_err(|_| ApiError::validation("Invalid input"))?;

    let worker = state
        .workers
        .set_availability(worker_id, is_available)
        .await?
        .ok_or_else(|| ApiError::not_found("Worker not found"))?;

    info!("Worker {} availability set to {}", worker_id, is_available);

    Ok(Json(AvailabilityResponse {
        success: true,
        message: "Availability updated successfully".to_string(),
        worker: WorkerResponse::from(worker),
    }))
}

/// Query parameters for proximity search. All fields are required; they are
/// optional here only so the missing-parameter message can be emitted as one
/// uniform error.
#[derive(Deserialize)]
pub struct SearchParams {
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Search radius in kilometers.
    pub radius: Option<f64>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub workers: Vec<SearchWorkerResponse>,
}

/// Find available workers in a category near a point, nearest first.
///
/// Each result's post references are resolved to full post records.
pub async fn search_workers(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, ApiError>,
) -> ApiResult<Json<SearchResponse>> {
    let (Some(category), Some(latitude), Some(longitude), Some(radius)) = (
        params.category,
        params.latitude,
        params.longitude,
        params.radius,
    ) else {
        return Err(ApiError::validation(
            "Missing search parameters (category, location, or radius)",
        ));
    };

    if !radius.is_finite() || radius <= 0.0 {
        return Err(ApiError::validation("radius must be greater than zero"));
    }

    let max_distance_meters = radius * 1000.0;
    let found = state
        .workers
        .find_nearby(&category, longitude, latitude, max_distance_meters)
        .await?;

    metrics::record_search(&normalize_category(&category));

    if found.is_empty() {
        return Err(ApiError::not_found(
            "No available workers found in this category and radius.",
        ));
    }

    let mut workers = Vec::with_capacity(found.len());
    for worker in found {
        let posts = state.posts.find_by_ids(&worker.posts).await?;
        workers.push(SearchWorkerResponse::new(worker, posts));
    }

    Ok(Json(SearchResponse {
        success: true,
        workers,
    }))
}
