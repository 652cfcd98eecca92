use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of a post's author carried on reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

/// Snapshot of a post's category, joined at read time.
///
/// Carries the publish flag because the visibility rule depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub is_published: bool,
}

/// Snapshot of a post's location, joined at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: Uuid,
    pub name: String,
}

/// Post entity - a blog publication.
///
/// `pub_date` may lie in the future to support scheduled publication;
/// `author` and `created_at` are stamped once at creation and the field set
/// a caller can supply ([`PostFields`]) cannot touch them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub author: AuthorRef,
    pub category: Option<CategoryRef>,
    pub location: Option<LocationRef>,
    /// Opaque reference into the binary asset store.
    pub image: Option<String>,
}

/// Caller-supplied fields for creating or replacing a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFields {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    #[serde(default = "default_published")]
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub image: Option<String>,
}

fn default_published() -> bool {
    true
}

impl Post {
    /// Assemble a new post from validated fields and resolved references.
    pub fn new(
        author: AuthorRef,
        fields: PostFields,
        category: Option<CategoryRef>,
        location: Option<LocationRef>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            text: fields.text,
            pub_date: fields.pub_date,
            is_published: fields.is_published,
            created_at: Utc::now(),
            author,
            category,
            location,
            image: fields.image,
        }
    }

    /// Replace the caller-editable fields, leaving identity, author and
    /// creation timestamp untouched.
    pub fn apply(
        &mut self,
        fields: PostFields,
        category: Option<CategoryRef>,
        location: Option<LocationRef>,
    ) {
        self.title = fields.title;
        self.text = fields.text;
        self.pub_date = fields.pub_date;
        self.is_published = fields.is_published;
        self.category = category;
        self.location = location;
        self.image = fields.image;
    }
}

/// A listing entry: a post annotated with its live comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEntry {
    pub post: Post,
    pub comment_count: u64,
}
