//! Postgres comment store.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DbConn, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use uuid::Uuid;

use quill_core::domain::{AuthorRef, Comment};
use quill_core::error::RepoError;
use quill_core::ports::CommentStore;

use super::entity::{comment, user};
use super::map_db_err;

#[derive(Debug, FromQueryResult)]
struct CommentRow {
    id: Uuid,
    text: String,
    created_at: chrono::DateTime<chrono::FixedOffset>,
    post_id: Uuid,
    author_id: Uuid,
    author_username: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            text: row.text,
            created_at: row.created_at.into(),
            post_id: row.post_id,
            author: AuthorRef {
                id: row.author_id,
                username: row.author_username,
            },
        }
    }
}

fn comment_rows() -> sea_orm::Select<comment::Entity> {
    comment::Entity::find()
        .select_only()
        .columns([
            comment::Column::Id,
            comment::Column::Text,
            comment::Column::CreatedAt,
            comment::Column::PostId,
            comment::Column::AuthorId,
        ])
        .column_as(user::Column::Username, "author_username")
        .join(JoinType::InnerJoin, comment::Relation::Author.def())
}

/// Postgres comment store.
pub struct PostgresCommentStore {
    db: DbConn,
}

impl PostgresCommentStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentStore for PostgresCommentStore {
    async fn find(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let row = comment_rows()
            .filter(comment::Column::Id.eq(id))
            .into_model::<CommentRow>()
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(Comment::from))
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = comment_rows()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .into_model::<CommentRow>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn insert(&self, record: &Comment) -> Result<(), RepoError> {
        comment::Entity::insert(comment::ActiveModel::from(record))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn update(&self, record: &Comment) -> Result<(), RepoError> {
        comment::Entity::update(comment::ActiveModel::from(record))
            .exec(&self.db)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => RepoError::NotFound,
                other => map_db_err(other),
            })
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = comment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
