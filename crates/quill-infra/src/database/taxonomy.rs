//! Postgres stores for the post taxonomy (categories and locations).
//!
//! Both are written through the external admin surface only; the core needs
//! lookups alone.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter};
use uuid::Uuid;

use quill_core::domain::{Category, Location};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryStore, LocationStore};

use super::entity::{category, location};
use super::map_db_err;

/// Postgres category store.
pub struct PostgresCategoryStore {
    db: DbConn,
}

impl PostgresCategoryStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryStore for PostgresCategoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let model = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.map(Into::into))
    }
}

/// Postgres location store.
pub struct PostgresLocationStore {
    db: DbConn,
}

impl PostgresLocationStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationStore for PostgresLocationStore {
    async fn find(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        let model = location::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.map(Into::into))
    }
}
