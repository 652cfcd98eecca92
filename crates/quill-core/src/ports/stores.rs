//! Storage ports.
//!
//! Listing methods return pages ordered by `pub_date` descending, each entry
//! annotated with a live comment count. The `list_*` methods apply the
//! public-visibility rule in the store (it has to happen before pagination);
//! the store-side filter must match `policy::is_public` exactly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Comment, Location, Post, PostEntry, User};
use crate::error::RepoError;
use crate::page::{Page, PageRequest};

/// How much of an author's work a profile listing exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorScope {
    /// Everything, including unpublished and future-dated posts
    /// (the author viewing their own profile).
    Everything,
    /// Only publicly visible posts.
    Public,
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    async fn list_public(
        &self,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError>;

    async fn list_in_category(
        &self,
        category_id: Uuid,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError>;

    async fn list_by_author(
        &self,
        author_id: Uuid,
        scope: AuthorScope,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError>;

    async fn insert(&self, post: &Post) -> Result<(), RepoError>;

    async fn update(&self, post: &Post) -> Result<(), RepoError>;

    /// Delete the post; the schema cascades to its comments.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    /// All comments on a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn insert(&self, comment: &Comment) -> Result<(), RepoError>;

    async fn update(&self, comment: &Comment) -> Result<(), RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Category>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Location>, RepoError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn insert(&self, user: &User) -> Result<(), RepoError>;

    async fn update(&self, user: &User) -> Result<(), RepoError>;
}
