//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::SiteConfig;
use quill_core::ports::{PasswordService, TokenService, UserStore};
use quill_core::services::{ContentService, ListingService};
use quill_infra::{
    Argon2PasswordService, DbConn, JwtConfig, JwtTokenService, PostgresCategoryStore,
    PostgresCommentStore, PostgresLocationStore, PostgresPostStore, PostgresUserStore,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub listing: Arc<ListingService>,
    pub content: Arc<ContentService>,
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub site: SiteConfig,
}

impl AppState {
    /// Wire the Postgres stores and services together.
    pub fn new(db: DbConn, site: SiteConfig, jwt: JwtConfig) -> Self {
        let posts = Arc::new(PostgresPostStore::new(db.clone()));
        let comments = Arc::new(PostgresCommentStore::new(db.clone()));
        let categories = Arc::new(PostgresCategoryStore::new(db.clone()));
        let locations = Arc::new(PostgresLocationStore::new(db.clone()));
        let users: Arc<dyn UserStore> = Arc::new(PostgresUserStore::new(db));

        let listing = Arc::new(ListingService::new(
            posts.clone(),
            comments.clone(),
            categories.clone(),
            users.clone(),
            site.clone(),
        ));
        let content = Arc::new(ContentService::new(
            posts,
            comments,
            categories,
            locations,
            users.clone(),
            site.clone(),
        ));

        tracing::info!("application state initialized");

        Self {
            listing,
            content,
            users,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            site,
        }
    }
}
