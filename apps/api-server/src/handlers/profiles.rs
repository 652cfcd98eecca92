//! Profile handlers: an author's post listing and own-profile editing.

use actix_web::{HttpResponse, web};

use quill_core::domain::ProfileFields;
use quill_shared::dto::{
    AccountResponse, MutationResponse, ProfilePageResponse, ProfileRequest, ProfileResponse,
};
use quill_shared::response::ApiResponse;

use super::{ListQuery, destination_path, page_response};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profiles/{username}/posts
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: OptionalIdentity,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .listing
        .list_by_author(&path.into_inner(), identity.viewer(), query.page)
        .await?;

    let body = ProfilePageResponse {
        profile: ProfileResponse {
            username: page.profile.username,
            first_name: page.profile.first_name,
            last_name: page.profile.last_name,
        },
        posts: page_response(page.posts, state.site.display_truncate_length),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// PUT /api/profile
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<ProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let (user, destination) = state
        .content
        .update_profile(
            identity.viewer(),
            ProfileFields {
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;

    let data = AccountResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(MutationResponse {
        data,
        redirect_to: destination_path(&destination),
    })))
}
