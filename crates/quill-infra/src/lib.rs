//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! Postgres stores via SeaORM, JWT tokens, Argon2 password hashing.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use sea_orm::DbConn;
pub use database::{
    DatabaseConfig, PostgresCategoryStore, PostgresCommentStore, PostgresLocationStore,
    PostgresPostStore, PostgresUserStore, connect,
};
