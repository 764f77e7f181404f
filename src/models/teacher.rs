use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Teacher {
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A username that passed the authenticator. Handed to the service so
/// `created_by` is always an authenticated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedTeacher {
    pub username: String,
}
