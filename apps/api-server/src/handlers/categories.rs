//! Category listing handler.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{CategoryPageResponse, CategoryResponse};
use quill_shared::response::ApiResponse;

use super::{ListQuery, page_response};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories/{slug}/posts
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .listing
        .list_by_category(&path.into_inner(), query.page)
        .await?;

    let body = CategoryPageResponse {
        category: CategoryResponse {
            slug: page.category.slug,
            title: page.category.title,
            description: page.category.description,
        },
        posts: page_response(page.posts, state.site.display_truncate_length),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}
