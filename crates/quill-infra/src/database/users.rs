//! Postgres user store.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use quill_core::domain::User;
use quill_core::error::RepoError;
use quill_core::ports::UserStore;

use super::entity::user;
use super::map_db_err;

/// Postgres user store.
pub struct PostgresUserStore {
    db: DbConn,
}

impl PostgresUserStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.map(Into::into))
    }

    async fn insert(&self, record: &User) -> Result<(), RepoError> {
        user::Entity::insert(user::ActiveModel::from(record))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn update(&self, record: &User) -> Result<(), RepoError> {
        user::Entity::update(user::ActiveModel::from(record))
            .exec(&self.db)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => RepoError::NotFound,
                other => map_db_err(other),
            })
    }
}
