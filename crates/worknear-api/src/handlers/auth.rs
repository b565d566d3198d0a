//! Registration and login handlers.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::info;

use worknear_models::{GeoPoint, Worker};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::responses::WorkerResponse;
use crate::security::{hash_password, verify_password};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub category: String,
    pub address: String,
    // Optional so the location-specific message fires instead of a generic
    // body rejection.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Register a new worker. Availability starts out false.
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    let required = [
        &req.name,
        &req.phone,
        &req.password,
        &req.category,
        &req.address,
    ];
    if required.iter().any(|s| s.trim().is_empty()) {
        return Err(ApiError::validation("All fields are required"));
    }

    let (Some(latitude), Some(longitude)) = (req.latitude, req.longitude) else {
        return Err(ApiError::validation(
            "Location data (latitude and longitude) is required for registration.",
        ));
    };

    let location = GeoPoint::new(longitude, latitude)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let password_hash = hash_password(&req.password)?;
    let worker = Worker::new(
        req.name,
        req.phone,
        password_hash,
        req.address,
        &req.category,
        location,
    );

    let category = worker.category.clone();
    state.workers.insert(&worker).await?;
    metrics::record_worker_registered(&category);

    Ok(Json(MessageResponse {
        success: true,
        message: "Registration successful!".to_string(),
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub worker: WorkerResponse,
}

/// Log a worker in and return the full record minus the password hash.
///
/// An unknown phone and a wrong password produce the same error so the
/// endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<Json<LoginResponse>> {
    let worker = state.workers.find_by_phone(&req.phone).await?;

    let worker = match worker {
        Some(w) if verify_password(&req.password, &w.password) => w,
        _ => {
            metrics::record_login(false);
            return Err(ApiError::Authentication);
        }
    };

    metrics::record_login(true);
    info!("Worker {} logged in", worker.phone);

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        worker: WorkerResponse::from(worker),
    }))
}
