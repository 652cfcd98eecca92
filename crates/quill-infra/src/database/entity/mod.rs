//! SeaORM entities. Referential behavior (cascade from users and posts,
//! set-null from categories and locations) is declared here and enforced by
//! the migration DDL.

pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod user;
