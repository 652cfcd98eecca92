//! Read-side operations: listings, category pages, profiles, post detail.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::SiteConfig;
use crate::domain::{Category, Comment, Post, PostEntry, User};
use crate::error::DomainError;
use crate::page::{Page, PageRequest};
use crate::policy::{self, Viewer};
use crate::ports::{AuthorScope, CategoryStore, CommentStore, PostStore, UserStore};

/// A post detail view: the post plus its comment thread.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub comment_count: u64,
}

/// A category page: the category itself plus one page of its visible posts.
#[derive(Debug, Clone)]
pub struct CategoryPage {
    pub category: Category,
    pub posts: Page<PostEntry>,
}

/// A profile page: the profile owner plus one page of their posts.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub profile: User,
    pub posts: Page<PostEntry>,
}

/// Read-side service. Every visibility decision funnels through
/// [`policy::is_visible`] or the stores' public filter; no method restates
/// the rule.
pub struct ListingService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    categories: Arc<dyn CategoryStore>,
    users: Arc<dyn UserStore>,
    config: SiteConfig,
}

impl ListingService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
        categories: Arc<dyn CategoryStore>,
        users: Arc<dyn UserStore>,
        config: SiteConfig,
    ) -> Self {
        Self {
            posts,
            comments,
            categories,
            users,
            config,
        }
    }

    fn page_request(&self, page: u64) -> PageRequest {
        PageRequest::new(page, self.config.page_size)
    }

    /// The site index: publicly visible posts, newest publication first.
    pub async fn list_public(&self, page: u64) -> Result<Page<PostEntry>, DomainError> {
        let posts = self
            .posts
            .list_public(Utc::now(), self.page_request(page))
            .await?;
        Ok(posts)
    }

    /// A category's page of publicly visible posts. The category gate comes
    /// first: an unknown or unpublished slug is `NotFound` regardless of
    /// what it contains.
    pub async fn list_by_category(
        &self,
        slug: &str,
        page: u64,
    ) -> Result<CategoryPage, DomainError> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or(DomainError::not_found("category"))?;

        let posts = self
            .posts
            .list_in_category(category.id, Utc::now(), self.page_request(page))
            .await?;

        Ok(CategoryPage { category, posts })
    }

    /// An author's profile page. Owners see all of their posts, unfiltered;
    /// everyone else sees the public subset.
    pub async fn list_by_author(
        &self,
        username: &str,
        viewer: Viewer,
        page: u64,
    ) -> Result<ProfilePage, DomainError> {
        let profile = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::not_found("user"))?;

        let scope = if viewer.is(profile.id) {
            AuthorScope::Everything
        } else {
            AuthorScope::Public
        };

        let posts = self
            .posts
            .list_by_author(profile.id, scope, Utc::now(), self.page_request(page))
            .await?;

        Ok(ProfilePage { profile, posts })
    }

    /// A single post with its comment thread.
    ///
    /// A post hidden from this viewer yields the same `NotFound` as a post
    /// that does not exist; callers must not be able to tell the two apart.
    pub async fn post_detail(&self, id: Uuid, viewer: Viewer) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .find(id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if !policy::is_visible(viewer, &post, Utc::now()) {
            return Err(DomainError::not_found("post"));
        }

        let comments = self.comments.list_for_post(post.id).await?;
        let comment_count = comments.len() as u64;

        Ok(PostDetail {
            post,
            comments,
            comment_count,
        })
    }
}
