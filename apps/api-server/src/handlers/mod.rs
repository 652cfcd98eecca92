//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod profiles;

use actix_web::web;

use quill_core::config::truncate_heading;
use quill_core::domain::{Comment, PostEntry};
use quill_core::page::Page;
use quill_core::services::Destination;
use quill_shared::dto::{CategoryBrief, CommentResponse, PageResponse, PostResponse};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts
            .route("/posts", web::get().to(posts::index))
            .route("/posts", web::post().to(posts::create))
            .route("/posts/{post_id}", web::get().to(posts::detail))
            .route("/posts/{post_id}", web::put().to(posts::update))
            .route("/posts/{post_id}", web::delete().to(posts::destroy))
            // Comments
            .route(
                "/posts/{post_id}/comments",
                web::post().to(comments::create),
            )
            .route(
                "/posts/{post_id}/comments/{comment_id}",
                web::put().to(comments::update),
            )
            .route(
                "/posts/{post_id}/comments/{comment_id}",
                web::delete().to(comments::destroy),
            )
            // Categories and profiles
            .route(
                "/categories/{slug}/posts",
                web::get().to(categories::posts),
            )
            .route(
                "/profiles/{username}/posts",
                web::get().to(profiles::posts),
            )
            .route("/profile", web::put().to(profiles::update)),
    );
}

/// Resolve a service-level destination to a route.
pub fn destination_path(destination: &Destination) -> String {
    match destination {
        Destination::Profile(username) => format!("/api/profiles/{username}/posts"),
        Destination::PostDetail(id) => format!("/api/posts/{id}"),
        Destination::Login => "/api/auth/login".to_string(),
    }
}

pub(crate) fn post_response(entry: PostEntry, truncate_at: usize) -> PostResponse {
    let post = entry.post;
    PostResponse {
        id: post.id,
        heading: truncate_heading(&post.title, truncate_at),
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        is_published: post.is_published,
        created_at: post.created_at,
        author: post.author.username,
        category: post.category.map(|c| CategoryBrief {
            slug: c.slug,
            title: c.title,
        }),
        location: post.location.map(|l| l.name),
        image: post.image,
        comment_count: entry.comment_count,
    }
}

pub(crate) fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        text: comment.text,
        created_at: comment.created_at,
        author: comment.author.username,
    }
}

pub(crate) fn page_response(
    page: Page<PostEntry>,
    truncate_at: usize,
) -> PageResponse<PostResponse> {
    let page = page.map(|entry| post_response(entry, truncate_at));
    PageResponse {
        page: page.number,
        page_size: page.size,
        total_items: page.total_items,
        total_pages: page.total_pages,
        items: page.items,
    }
}

/// Listing query parameters.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default = "first_page")]
    pub page: u64,
}

fn first_page() -> u64 {
    1
}
