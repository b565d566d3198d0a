//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "worknear_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "worknear_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "worknear_http_requests_in_flight";

    // Domain metrics
    pub const WORKERS_REGISTERED_TOTAL: &str = "worknear_workers_registered_total";
    pub const LOGINS_TOTAL: &str = "worknear_logins_total";
    pub const SEARCHES_TOTAL: &str = "worknear_searches_total";
    pub const POSTS_CREATED_TOTAL: &str = "worknear_posts_created_total";
    pub const POSTS_DELETED_TOTAL: &str = "worknear_posts_deleted_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a worker registration.
pub fn record_worker_registered(category: &str) {
    let labels = [("category", category.to_string())];
    counter!(names::WORKERS_REGISTERED_TOTAL, &labels).increment(1);
}

/// Record a login attempt.
pub fn record_login(success: bool) {
    let labels = [("outcome", if success { "success" } else { "failure" })];
    counter!(names::LOGINS_TOTAL, &labels).increment(1);
}

/// Record a proximity search.
pub fn record_search(category: &str) {
    let labels = [("category", category.to_string())];
    counter!(names::SEARCHES_TOTAL, &labels).increment(1);
}

/// Record a created post.
pub fn record_post_created(with_image: bool) {
    let labels = [("with_image", with_image.to_string())];
    counter!(names::POSTS_CREATED_TOTAL, &labels).increment(1);
}

/// Record a deleted post.
pub fn record_post_deleted() {
    counter!(names::POSTS_DELETED_TOTAL).increment(1);
}

/// Sanitize path for metrics labels (remove IDs, etc.).
fn sanitize_path(path: &str) -> String {
    // Document ids are 24-hex ObjectId strings. Two passes because the
    // delete route carries two ids separated by one slash, which the first
    // pass consumes.
    let id_re = regex_lite::Regex::new(r"/[0-9a-f]{24}(/|$)").unwrap();
    let path = id_re.replace_all(path, "/:id$1");
    let path = id_re.replace_all(&path, "/:id$1");
    // Uploaded filenames under the static prefix
    let path = regex_lite::Regex::new(r"/uploads/[A-Za-z0-9_.-]+")
        .unwrap()
        .replace_all(&path, "/uploads/:file");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
