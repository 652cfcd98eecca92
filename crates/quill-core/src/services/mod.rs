//! Service orchestration over the storage ports.
//!
//! [`ListingService`] covers the read side, [`ContentService`] the write
//! side. Both are thin: policies live in [`crate::policy`], field checks in
//! [`crate::validate`]; the services compose them with the stores.

mod content;
mod listing;

#[cfg(test)]
mod tests;

pub use content::ContentService;
pub use listing::{CategoryPage, ListingService, PostDetail, ProfilePage};

use uuid::Uuid;

/// Where the caller should land after an operation, resolved to a concrete
/// route at the HTTP edge.
///
/// Successful mutations navigate somewhere useful, and a denied mutation
/// falls back to the post's detail view instead of an error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The profile page of the named user.
    Profile(String),
    /// The detail view of a post.
    PostDetail(Uuid),
    /// The login entry point of the auth subsystem.
    Login,
}
