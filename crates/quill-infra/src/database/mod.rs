//! Postgres storage layer.

mod comments;
mod connections;
pub mod entity;
mod posts;
mod taxonomy;
mod users;


pub use comments::PostgresCommentStore;
pub use connections::{DatabaseConfig, connect};
pub use posts::PostgresPostStore;
pub use taxonomy::{PostgresCategoryStore, PostgresLocationStore};
pub use users::PostgresUserStore;

use quill_core::error::RepoError;
use sea_orm::DbErr;

/// Map a SeaORM error onto the storage error taxonomy.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        other => {
            let text = other.to_string();
            if text.contains("duplicate") || text.contains("unique") {
                RepoError::Constraint(text)
            } else {
                RepoError::Query(text)
            }
        }
    }
}
