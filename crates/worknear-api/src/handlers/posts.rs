//! Post upload, listing, and deletion handlers.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::handlers::auth::MessageResponse;
use crate::responses::PostResponse;
use crate::state::AppState;

/// Upload a post as multipart form data.
///
/// Expected fields: `workerId` (text), `text` (text), and an optional
/// `image` file. Unknown fields are ignored.
pub async fn upload_post(
    State(state): State<AppState>,
    WithRejection(mut multipart, _): WithRejection<Multipart, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    let mut worker_id: Option<String> = None;
    let mut text: Option<String> = None;
    let mut image: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(field) = multipart.next_field().await? {
        // The name has to be captured before the field body is consumed.
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "workerId" => worker_id = Some(field.text().await?),
            "text" => text = Some(field.text().await?),
            "image" => {
                let file_name = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await?.to_vec();
                image = Some((data, file_name));
            }
            _ => {}
        }
    }

    let worker_id = worker_id.ok_or_else(|| ApiError::validation("workerId is required"))?;
    let worker_id = parse_object_id(&worker_id, "Invalid worker id")?;
    let text = text.ok_or_else(|| ApiError::validation("text is required"))?;

    state.post_service.create_post(worker_id, &text, image).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Post uploaded successfully".to_string(),
    }))
}

#[derive(Serialize)]
pub struct PostListResponse {
    pub success: bool,
    pub posts: Vec<PostResponse>,
}

/// List a worker's posts, newest first.
pub async fn get_posts(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> ApiResult<Json<PostListResponse>> {
    let worker_id = parse_object_id(&worker_id, "Invalid worker id")?;
    let posts = state.posts.list_by_worker(worker_id).await?;

    Ok(Json(PostListResponse {
        success: true,
        posts: posts.into_iter().map(PostResponse::from).collect(),
    }))
}

/// Delete a post and detach it from the owning worker.
pub async fn delete_post(
    State(state): State<AppState>,
    Path((post_id, worker_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let post_id = parse_object_id(&post_id, "Invalid post id")?;
    let worker_id = parse_object_id(&worker_id, "Invalid worker id")?;

    state.post_service.delete_post(post_id, worker_id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Post deleted".to_string(),
    }))
}

fn parse_object_id(raw: &str, message: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::validation(message))
}
