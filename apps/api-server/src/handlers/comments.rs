//! Comment handlers - nested under their post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::dto::{CommentRequest, MutationResponse};
use quill_shared::response::ApiResponse;

use super::{comment_response, destination_path};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments
pub async fn create(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: OptionalIdentity,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (comment, destination) = state
        .content
        .create_comment(identity.viewer(), path.into_inner(), body.into_inner().text)
        .await?;

    tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(MutationResponse {
        data: comment_response(comment),
        redirect_to: destination_path(&destination),
    })))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    identity: OptionalIdentity,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let (comment, destination) = state
        .content
        .update_comment(identity.viewer(), post_id, comment_id, body.into_inner().text)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MutationResponse {
        data: comment_response(comment),
        redirect_to: destination_path(&destination),
    })))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn destroy(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let destination = state
        .content
        .delete_comment(identity.viewer(), post_id, comment_id)
        .await?;

    tracing::info!(%comment_id, %post_id, "comment deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MutationResponse {
        data: (),
        redirect_to: destination_path(&destination),
    })))
}
