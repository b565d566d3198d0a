//! API integration tests.
//!
//! Tests that need a live MongoDB are marked `#[ignore]`; the remaining
//! tests fall back to a minimal router when no database is reachable.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Test health endpoint.
#[tokio::test]
async fn test_health_endpoint() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}

/// Test CORS headers on a preflight request.
#[tokio::test]
async fn test_cors_preflight() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .header("Access-Control-Request-Method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status() == StatusCode::OK || response.status() == StatusCode::NO_CONTENT);
    assert!(response
        .headers()
        .contains_key("Access-Control-Allow-Origin"));
}

/// Test that every response carries a request id.
#[tokio::test]
async fn test_request_id_header() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("X-Request-ID"));
}

/// Register, log in, and toggle availability against a live database.
#[tokio::test]
#[ignore = "requires MongoDB"]
async fn test_register_login_availability_flow() {
    dotenvy::dotenv().ok();

    let app = real_router().await;
    let phone = format!("test-{}", uuid::Uuid::new_v4());

    // Register
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            serde_json::json!({
                "name": "Test Worker",
                "phone": phone,
                "password": "s3cret",
                "category": "Plumber",
                "address": "12 Main St",
                "latitude": 12.97,
                "longitude": 77.59,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Duplicate phone is rejected
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            serde_json::json!({
                "name": "Test Worker",
                "phone": phone,
                "password": "s3cret",
                "category": "Plumber",
                "address": "12 Main St",
                "latitude": 12.97,
                "longitude": 77.59,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Login with the right password
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            serde_json::json!({ "phone": phone, "password": "s3cret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert!(json["worker"].get("password").is_none());
    assert_eq!(json["worker"]["category"], "plumber");
    let worker_id = json["worker"]["id"].as_str().unwrap().to_string();

    // Wrong password gets the same shape as an unknown phone
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            serde_json::json!({ "phone": phone, "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Toggle availability
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/worker/availability",
            serde_json::json!({ "workerId": worker_id, "isAvailable": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["worker"]["isAvailable"], true);
}

/// Availability update on a nonexistent worker returns 404.
#[tokio::test]
#[ignore = "requires MongoDB"]
async fn test_availability_unknown_worker() {
    dotenvy::dotenv().ok();

    let app = real_router().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/worker/availability",
            serde_json::json!({
                "workerId": "64f1a2b3c4d5e6f7a8b9c0d1",
                "isAvailable": true,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Search validation without touching worker data.
#[tokio::test]
#[ignore = "requires MongoDB"]
async fn test_search_missing_parameters() {
    dotenvy::dotenv().ok();

    let app = real_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/workers/search?category=plumber&latitude=12.9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
}

/// Upload a post with an image, list it, then delete it.
#[tokio::test]
#[ignore = "requires MongoDB"]
async fn test_post_upload_list_delete_flow() {
    dotenvy::dotenv().ok();

    let app = real_router().await;
    let phone = format!("test-{}", uuid::Uuid::new_v4());

    // Need a worker to own the post
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            serde_json::json!({
                "name": "Poster",
                "phone": phone,
                "password": "s3cret",
                "category": "electrician",
                "address": "9 Side St",
                "latitude": 12.97,
                "longitude": 77.59,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            serde_json::json!({ "phone": phone, "password": "s3cret" }),
        ))
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let worker_id = json["worker"]["id"].as_str().unwrap().to_string();

    // Upload a post with an image
    let boundary = "----worknear-test-boundary";
    let body = multipart_body(
        boundary,
        &[("workerId", &worker_id), ("text", "available weekends")],
        Some(("image", "photo.jpg", b"fake image bytes")),
    );
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload-post")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The post shows up newest-first with a resolvable image key
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/get-posts/{}", worker_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let posts = json["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["text"], "available weekends");
    let post_id = posts[0]["id"].as_str().unwrap().to_string();
    let image = posts[0]["image"].as_str().unwrap().to_string();
    assert!(image.starts_with("uploads/"));

    // The image is served under the static prefix
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/{}", image))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Delete the post
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/delete-post/{}/{}", post_id, worker_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Gone from the listing
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/get-posts/{}", worker_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["posts"].as_array().unwrap().is_empty());

    // Deleting again is a 404
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/delete-post/{}/{}", post_id, worker_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Registration without latitude/longitude fails validation no matter how
/// valid the other fields are.
#[tokio::test]
#[ignore = "requires MongoDB"]
async fn test_register_requires_location() {
    dotenvy::dotenv().ok();

    let app = real_router().await;
    let phone = format!("test-{}", uuid::Uuid::new_v4());

    let response = app
        .oneshot(json_request(
            "POST",
            "/register",
            serde_json::json!({
                "name": "No Location",
                "phone": phone,
                "password": "s3cret",
                "category": "plumber",
                "address": "1 Somewhere",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("Location data"));
}

/// Radius inclusion/exclusion, nearest-first ordering, and the availability
/// filter, with workers seeded at known coordinates.
///
/// Latitude offsets from the search point put the workers at known
/// distances: 0.01 degrees of latitude is about 1.11 km.
#[tokio::test]
#[ignore = "requires MongoDB"]
async fn test_proximity_search_properties() {
    dotenvy::dotenv().ok();

    let app = real_router().await;
    // Unique category so seeded workers from other runs stay out of scope
    let category = format!("cat-{}", uuid::Uuid::new_v4());
    let (center_lat, center_lng) = (12.9716, 77.5946);

    // ~1.1 km and ~10 km away, plus one unavailable worker ~0.55 km away
    let near = seed_worker(&app, &category, center_lat + 0.010, center_lng).await;
    let far = seed_worker(&app, &category, center_lat + 0.090, center_lng).await;
    let idle = seed_worker(&app, &category, center_lat + 0.005, center_lng).await;
    make_available(&app, &near).await;
    make_available(&app, &far).await;
    // `idle` keeps its registration default of unavailable

    // Only the unavailable worker is inside 0.8 km, so the search is empty
    let (status, _) = search(&app, &category, center_lat, center_lng, 0.8).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 3 km includes the near worker and excludes the far one
    let (status, json) = search(&app, &category, center_lat, center_lng, 3.0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_ids(&json), vec![near.clone()]);

    // 20 km includes both, nearest first; the unavailable worker is still
    // excluded even though it is the closest of all three
    let (status, json) = search(&app, &category, center_lat, center_lng, 20.0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_ids(&json), vec![near, far]);
    assert!(!result_ids(&json).contains(&idle));
}

/// Register a worker at a coordinate and return its id.
async fn seed_worker(
    app: &axum::Router,
    category: &str,
    latitude: f64,
    longitude: f64,
) -> String {
    let phone = format!("test-{}", uuid::Uuid::new_v4());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            serde_json::json!({
                "name": "Seeded Worker",
                "phone": phone,
                "password": "s3cret",
                "category": category,
                "address": "1 Test Rd",
                "latitude": latitude,
                "longitude": longitude,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            serde_json::json!({ "phone": phone, "password": "s3cret" }),
        ))
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["worker"]["id"].as_str().unwrap().to_string()
}

async fn make_available(app: &axum::Router, worker_id: &str) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/worker/availability",
            serde_json::json!({ "workerId": worker_id, "isAvailable": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn search(
    app: &axum::Router,
    category: &str,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/workers/search?category={}&latitude={}&longitude={}&radius={}",
                    category, latitude, longitude, radius_km
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

fn result_ids(json: &serde_json::Value) -> Vec<String> {
    json["workers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_str().unwrap().to_string())
        .collect()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_body(
    boundary: &str,
    text_fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in text_fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                boundary, name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}

/// Router backed by a live database; panics if the database is unreachable.
/// Only the `#[ignore]`d tests use this.
async fn real_router() -> axum::Router {
    use worknear_api::{create_router, ApiConfig, AppState};

    let config = ApiConfig::from_env();
    let state = AppState::new(config)
        .await
        .expect("MongoDB must be reachable for ignored integration tests");
    create_router(state, None)
}

/// Helper to create a test router. When `MONGODB_URI` is unset the fallback
/// router is built directly, so the basic endpoint tests run anywhere
/// without waiting out the driver's server-selection timeout.
async fn create_test_router() -> axum::Router {
    use worknear_api::{create_router, ApiConfig, AppState};

    if std::env::var("MONGODB_URI").is_err() {
        return fallback_router();
    }

    match AppState::new(ApiConfig::from_env()).await {
        Ok(state) => create_router(state, None),
        Err(_) => fallback_router(),
    }
}

/// Minimal router with the same middleware stack as the real one.
fn fallback_router() -> axum::Router {
    use axum::routing::get;
    use axum::Json;
    use serde_json::json;

    axum::Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "status": "healthy",
                    "version": env!("CARGO_PKG_VERSION")
                }))
            }),
        )
        .layer(axum::middleware::from_fn(worknear_api::middleware::request_id))
        .layer(worknear_api::middleware::cors_layer(&["*".to_string()]))
}
