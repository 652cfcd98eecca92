use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an author of posts and comments.
///
/// Authentication itself lives behind the auth ports; the rest of the core
/// only cares about identity and equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and creation timestamp.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            is_staff: false,
            created_at: Utc::now(),
        }
    }
}

/// The subset of user fields a user may edit on their own profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFields {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}
