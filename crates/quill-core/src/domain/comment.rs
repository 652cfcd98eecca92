use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthorRef;

/// Comment entity - attached to exactly one post.
///
/// Lives and dies with its post and its author (cascade on both).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub post_id: Uuid,
    pub author: AuthorRef,
}

impl Comment {
    pub fn new(author: AuthorRef, post_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            created_at: Utc::now(),
            post_id,
            author,
        }
    }
}
