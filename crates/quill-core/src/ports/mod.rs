//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod stores;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use stores::{
    AuthorScope, CategoryStore, CommentStore, LocationStore, PostStore, UserStore,
};
