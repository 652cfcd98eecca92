//! Write-side operations: post, comment and profile mutations.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::SiteConfig;
use crate::domain::{
    AuthorRef, CategoryRef, Comment, LocationRef, Post, PostFields, ProfileFields, User,
};
use crate::error::DomainError;
use crate::policy::{self, Viewer};
use crate::ports::{CategoryStore, CommentStore, LocationStore, PostStore, UserStore};
use crate::validate::{self, FieldError};

use super::Destination;

/// Write-side service. Ownership is checked through [`policy::can_mutate`]
/// on every update/delete; author and creation timestamp are stamped once at
/// creation and are structurally absent from [`PostFields`].
pub struct ContentService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    categories: Arc<dyn CategoryStore>,
    locations: Arc<dyn LocationStore>,
    users: Arc<dyn UserStore>,
    config: SiteConfig,
}

impl ContentService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
        categories: Arc<dyn CategoryStore>,
        locations: Arc<dyn LocationStore>,
        users: Arc<dyn UserStore>,
        config: SiteConfig,
    ) -> Self {
        Self {
            posts,
            comments,
            categories,
            locations,
            users,
            config,
        }
    }

    async fn acting_user(&self, viewer: Viewer) -> Result<User, DomainError> {
        let id = viewer.user_id().ok_or(DomainError::Unauthenticated)?;
        self.users
            .find(id)
            .await?
            .ok_or(DomainError::not_found("user"))
    }

    /// Resolve the optional category/location references in `fields`.
    /// A dangling id is a field-level validation failure, not a 404.
    async fn resolve_refs(
        &self,
        fields: &PostFields,
    ) -> Result<(Option<CategoryRef>, Option<LocationRef>), DomainError> {
        let category = match fields.category_id {
            Some(id) => match self.categories.find(id).await? {
                Some(c) => Some(CategoryRef {
                    id: c.id,
                    slug: c.slug,
                    title: c.title,
                    is_published: c.is_published,
                }),
                None => {
                    return Err(DomainError::Validation(vec![FieldError {
                        field: "category_id",
                        message: "unknown category".to_owned(),
                    }]));
                }
            },
            None => None,
        };

        let location = match fields.location_id {
            Some(id) => match self.locations.find(id).await? {
                Some(l) => Some(LocationRef {
                    id: l.id,
                    name: l.name,
                }),
                None => {
                    return Err(DomainError::Validation(vec![FieldError {
                        field: "location_id",
                        message: "unknown location".to_owned(),
                    }]));
                }
            },
            None => None,
        };

        Ok((category, location))
    }

    /// Create a post authored by the viewer. Lands on the author's own
    /// profile, not the new post.
    pub async fn create_post(
        &self,
        viewer: Viewer,
        fields: PostFields,
    ) -> Result<(Post, Destination), DomainError> {
        let user = self.acting_user(viewer).await?;
        validate::post_fields(&fields, &self.config).map_err(DomainError::Validation)?;
        let (category, location) = self.resolve_refs(&fields).await?;

        let author = AuthorRef {
            id: user.id,
            username: user.username.clone(),
        };
        let post = Post::new(author, fields, category, location);
        self.posts.insert(&post).await?;

        Ok((post, Destination::Profile(user.username)))
    }

    /// Replace a post's editable fields. Non-authors are sent back to the
    /// post's detail view; author and created_at survive any input.
    pub async fn update_post(
        &self,
        viewer: Viewer,
        id: Uuid,
        fields: PostFields,
    ) -> Result<(Post, Destination), DomainError> {
        let mut post = self
            .posts
            .find(id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if !policy::can_mutate(viewer, post.author.id) {
            return Err(DomainError::Forbidden {
                fallback: Destination::PostDetail(id),
            });
        }

        validate::post_fields(&fields, &self.config).map_err(DomainError::Validation)?;
        let (category, location) = self.resolve_refs(&fields).await?;

        post.apply(fields, category, location);
        self.posts.update(&post).await?;

        Ok((post, Destination::PostDetail(id)))
    }

    /// Delete a post and, via the schema cascade, its comments.
    pub async fn delete_post(
        &self,
        viewer: Viewer,
        id: Uuid,
    ) -> Result<Destination, DomainError> {
        let post = self
            .posts
            .find(id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if !policy::can_mutate(viewer, post.author.id) {
            return Err(DomainError::Forbidden {
                fallback: Destination::PostDetail(id),
            });
        }

        self.posts.delete(id).await?;
        Ok(Destination::Profile(post.author.username))
    }

    /// Comment on a post. By default only the post's existence is checked,
    /// not its visibility to the commenter; `strict_comment_visibility`
    /// tightens this to the full visibility rule.
    pub async fn create_comment(
        &self,
        viewer: Viewer,
        post_id: Uuid,
        text: String,
    ) -> Result<(Comment, Destination), DomainError> {
        let user = self.acting_user(viewer).await?;

        let post = self
            .posts
            .find(post_id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if self.config.strict_comment_visibility
            && !policy::is_visible(viewer, &post, Utc::now())
        {
            return Err(DomainError::not_found("post"));
        }

        validate::comment_text(&text).map_err(DomainError::Validation)?;

        let author = AuthorRef {
            id: user.id,
            username: user.username,
        };
        let comment = Comment::new(author, post.id, text);
        self.comments.insert(&comment).await?;

        Ok((comment, Destination::PostDetail(post.id)))
    }

    async fn owned_comment(
        &self,
        viewer: Viewer,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment, DomainError> {
        let comment = self
            .comments
            .find(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or(DomainError::not_found("comment"))?;

        if !policy::can_mutate(viewer, comment.author.id) {
            return Err(DomainError::Forbidden {
                fallback: Destination::PostDetail(post_id),
            });
        }

        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        viewer: Viewer,
        post_id: Uuid,
        comment_id: Uuid,
        text: String,
    ) -> Result<(Comment, Destination), DomainError> {
        let mut comment = self.owned_comment(viewer, post_id, comment_id).await?;

        validate::comment_text(&text).map_err(DomainError::Validation)?;

        comment.text = text;
        self.comments.update(&comment).await?;

        Ok((comment, Destination::PostDetail(post_id)))
    }

    pub async fn delete_comment(
        &self,
        viewer: Viewer,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Destination, DomainError> {
        let comment = self.owned_comment(viewer, post_id, comment_id).await?;

        self.comments.delete(comment.id).await?;
        Ok(Destination::PostDetail(post_id))
    }

    /// Edit the viewer's own profile fields.
    pub async fn update_profile(
        &self,
        viewer: Viewer,
        fields: ProfileFields,
    ) -> Result<(User, Destination), DomainError> {
        let mut user = self.acting_user(viewer).await?;

        validate::profile_fields(&fields, &self.config).map_err(DomainError::Validation)?;

        user.email = fields.email;
        user.first_name = fields.first_name;
        user.last_name = fields.last_name;
        self.users.update(&user).await?;

        let username = user.username.clone();
        Ok((user, Destination::Profile(username)))
    }
}
