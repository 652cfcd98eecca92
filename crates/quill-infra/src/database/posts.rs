//! Postgres post store.
//!
//! All reads go through one joined query shape (author, category, location,
//! comment count) and all public listings go through one `Condition`
//! builder, [`publicly_visible`] - the SQL mirror of
//! `quill_core::policy::is_public`. Keeping a single definition of each is
//! what stops the visibility rule from drifting between endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DbConn, DbErr, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use quill_core::domain::{AuthorRef, CategoryRef, LocationRef, Post, PostEntry};
use quill_core::error::RepoError;
use quill_core::page::{Page, PageRequest};
use quill_core::ports::{AuthorScope, PostStore};

use super::entity::{category, comment, location, post, user};
use super::map_db_err;

/// Fully joined post row.
#[derive(Debug, FromQueryResult)]
struct PostRow {
    id: Uuid,
    title: String,
    text: String,
    pub_date: chrono::DateTime<chrono::FixedOffset>,
    is_published: bool,
    created_at: chrono::DateTime<chrono::FixedOffset>,
    image: Option<String>,
    author_id: Uuid,
    author_username: String,
    category_id: Option<Uuid>,
    category_slug: Option<String>,
    category_title: Option<String>,
    category_is_published: Option<bool>,
    location_id: Option<Uuid>,
    location_name: Option<String>,
    comment_count: i64,
}

impl From<PostRow> for PostEntry {
    fn from(row: PostRow) -> Self {
        let comment_count = row.comment_count.max(0) as u64;
        let category = match (
            row.category_id,
            row.category_slug,
            row.category_title,
            row.category_is_published,
        ) {
            (Some(id), Some(slug), Some(title), Some(is_published)) => Some(CategoryRef {
                id,
                slug,
                title,
                is_published,
            }),
            _ => None,
        };
        let location = match (row.location_id, row.location_name) {
            (Some(id), Some(name)) => Some(LocationRef { id, name }),
            _ => None,
        };

        PostEntry {
            post: Post {
                id: row.id,
                title: row.title,
                text: row.text,
                pub_date: row.pub_date.into(),
                is_published: row.is_published,
                created_at: row.created_at.into(),
                author: AuthorRef {
                    id: row.author_id,
                    username: row.author_username,
                },
                category,
                location,
                image: row.image,
            },
            comment_count,
        }
    }
}

/// The SQL form of the public-visibility rule: published, past-dated,
/// category absent or published.
fn publicly_visible(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(now))
        .add(
            Condition::any()
                .add(post::Column::CategoryId.is_null())
                .add(category::Column::IsPublished.eq(true)),
        )
}

/// The joined select every read uses: author inner-joined, category and
/// location left-joined, comment count aggregated per post.
fn post_rows() -> sea_orm::Select<post::Entity> {
    post::Entity::find()
        .select_only()
        .columns([
            post::Column::Id,
            post::Column::Title,
            post::Column::Text,
            post::Column::PubDate,
            post::Column::IsPublished,
            post::Column::CreatedAt,
            post::Column::Image,
            post::Column::AuthorId,
        ])
        .column_as(user::Column::Username, "author_username")
        .column_as(category::Column::Id, "category_id")
        .column_as(category::Column::Slug, "category_slug")
        .column_as(category::Column::Title, "category_title")
        .column_as(category::Column::IsPublished, "category_is_published")
        .column_as(location::Column::Id, "location_id")
        .column_as(location::Column::Name, "location_name")
        .column_as(comment::Column::Id.count(), "comment_count")
        .join(JoinType::InnerJoin, post::Relation::Author.def())
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .join(JoinType::LeftJoin, post::Relation::Location.def())
        .join(JoinType::LeftJoin, post::Relation::Comments.def())
        .group_by(post::Column::Id)
        .group_by(user::Column::Username)
        .group_by(category::Column::Id)
        .group_by(location::Column::Id)
}

/// Postgres post store.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn page_of(
        &self,
        condition: Condition,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let paginator = post_rows()
            .filter(condition)
            .order_by_desc(post::Column::PubDate)
            .into_model::<PostRow>()
            .paginate(&self.db, page.size);

        let total_items = paginator.num_items().await.map_err(map_db_err)?;
        let rows = paginator
            .fetch_page(page.number - 1)
            .await
            .map_err(map_db_err)?;

        let items = rows.into_iter().map(PostEntry::from).collect();
        Ok(Page::new(items, page, total_items))
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn find(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let row = post_rows()
            .filter(post::Column::Id.eq(id))
            .into_model::<PostRow>()
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(|r| PostEntry::from(r).post))
    }

    async fn list_public(
        &self,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        self.page_of(publicly_visible(now), page).await
    }

    async fn list_in_category(
        &self,
        category_id: Uuid,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let condition = publicly_visible(now).add(post::Column::CategoryId.eq(category_id));
        self.page_of(condition, page).await
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        scope: AuthorScope,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let condition = match scope {
            AuthorScope::Everything => Condition::all().add(post::Column::AuthorId.eq(author_id)),
            AuthorScope::Public => publicly_visible(now).add(post::Column::AuthorId.eq(author_id)),
        };
        self.page_of(condition, page).await
    }

    async fn insert(&self, record: &Post) -> Result<(), RepoError> {
        post::Entity::insert(post::ActiveModel::from(record))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn update(&self, record: &Post) -> Result<(), RepoError> {
        post::Entity::update(post::ActiveModel::from(record))
            .exec(&self.db)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => RepoError::NotFound,
                other => map_db_err(other),
            })
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
