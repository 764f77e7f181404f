use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: Uuid,
    pub message: String,
    pub start_date: Option<DateTime<Utc>>,
    /// `None` once cleared through an update; such an announcement never expires.
    pub expiration_date: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Announcement {
    /// Whether the announcement is inside its visibility window at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.start_date.map_or(true, |start| start <= now);
        let not_expired = self.expiration_date.map_or(true, |end| end >= now);
        started && not_expired
    }
}

/// Validated values for a new row. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub message: String,
    pub start_date: Option<DateTime<Utc>>,
    pub expiration_date: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// What an update does to a single nullable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Keep
    }
}

impl<T: Copy> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }

    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            FieldUpdate::Keep => current,
            FieldUpdate::Clear => None,
            FieldUpdate::Set(value) => Some(value),
        }
    }

    /// `(touched, new value)` pair, the shape the SQL update binds.
    pub fn as_binds(&self) -> (bool, Option<T>) {
        match self {
            FieldUpdate::Keep => (false, None),
            FieldUpdate::Clear => (true, None),
            FieldUpdate::Set(value) => (true, Some(*value)),
        }
    }
}

/// Validated partial update. Only touched fields are written.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementPatch {
    pub message: Option<String>,
    pub start_date: FieldUpdate<DateTime<Utc>>,
    pub expiration_date: FieldUpdate<DateTime<Utc>>,
}

impl AnnouncementPatch {
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.start_date.is_keep() && self.expiration_date.is_keep()
    }

    pub fn apply_to(&self, announcement: &mut Announcement) {
        if let Some(message) = &self.message {
            announcement.message = message.clone();
        }
        announcement.start_date = self.start_date.apply(announcement.start_date);
        announcement.expiration_date = self.expiration_date.apply(announcement.expiration_date);
    }
}

/// Raw request fields for create and update, taken from the query string
/// and optionally overridden by a JSON body. Dates stay as strings until
/// the service validates them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnouncementParams {
    pub username: Option<String>,
    pub message: Option<String>,
    pub expiration_date: Option<String>,
    pub start_date: Option<String>,
}

impl AnnouncementParams {
    /// Keys set in `body` win over the ones already present.
    pub fn merge(self, body: AnnouncementParams) -> AnnouncementParams {
        AnnouncementParams {
            username: body.username.or(self.username),
            message: body.message.or(self.message),
            expiration_date: body.expiration_date.or(self.expiration_date),
            start_date: body.start_date.or(self.start_date),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: Option<String>,
}
