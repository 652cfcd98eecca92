//! Post handlers: the public index, post detail, and post mutations.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{PostEntry, PostFields};
use quill_shared::dto::{MutationResponse, PostDetailResponse, PostRequest};
use quill_shared::response::ApiResponse;

use super::{ListQuery, comment_response, destination_path, page_response, post_response};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn post_fields(req: PostRequest) -> PostFields {
    PostFields {
        title: req.title,
        text: req.text,
        pub_date: req.pub_date,
        is_published: req.is_published,
        category_id: req.category_id,
        location_id: req.location_id,
        image: req.image,
    }
}

/// GET /api/posts
pub async fn index(state: web::Data<AppState>, query: web::Query<ListQuery>) -> AppResult<HttpResponse> {
    let page = state.listing.list_public(query.page).await?;
    let body = page_response(page, state.site.display_truncate_length);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// GET /api/posts/{post_id}
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let detail = state
        .listing
        .post_detail(path.into_inner(), identity.viewer())
        .await?;

    let body = PostDetailResponse {
        post: post_response(
            PostEntry {
                post: detail.post,
                comment_count: detail.comment_count,
            },
            state.site.display_truncate_length,
        ),
        comments: detail.comments.into_iter().map(comment_response).collect(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let (post, destination) = state
        .content
        .create_post(identity.viewer(), post_fields(body.into_inner()))
        .await?;

    tracing::info!(post_id = %post.id, "post created");

    let data = post_response(
        PostEntry {
            post,
            comment_count: 0,
        },
        state.site.display_truncate_length,
    );
    Ok(HttpResponse::Created().json(ApiResponse::ok(MutationResponse {
        data,
        redirect_to: destination_path(&destination),
    })))
}

/// PUT /api/posts/{post_id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: OptionalIdentity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    let (post, destination) = state
        .content
        .update_post(viewer, path.into_inner(), post_fields(body.into_inner()))
        .await?;

    // Re-read the thread for the live comment count.
    let thread = state.listing.post_detail(post.id, viewer).await?;

    let data = post_response(
        PostEntry {
            post,
            comment_count: thread.comment_count,
        },
        state.site.display_truncate_length,
    );
    Ok(HttpResponse::Ok().json(ApiResponse::ok(MutationResponse {
        data,
        redirect_to: destination_path(&destination),
    })))
}

/// DELETE /api/posts/{post_id}
pub async fn destroy(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let destination = state.content.delete_post(identity.viewer(), post_id).await?;

    tracing::info!(%post_id, "post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MutationResponse {
        data: (),
        redirect_to: destination_path(&destination),
    })))
}
