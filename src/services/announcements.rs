use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::AnnouncementStore,
    error::{AppError, AppResult},
    models::announcement::{
        Announcement, AnnouncementParams, AnnouncementPatch, FieldUpdate, NewAnnouncement,
    },
    services::{auth::Authenticator, clock::Clock, metrics, timestamps::parse_timestamp},
};

const NOT_FOUND: &str = "Announcement not found";

/// Request handling for announcements. Holds only injected handles, so a
/// clone is cheap and every request sees the same collaborators.
#[derive(Clone)]
pub struct AnnouncementService {
    store: Arc<dyn AnnouncementStore>,
    auth: Arc<dyn Authenticator>,
    clock: Arc<dyn Clock>,
}

impl AnnouncementService {
    pub fn new(
        store: Arc<dyn AnnouncementStore>,
        auth: Arc<dyn Authenticator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, auth, clock }
    }

    pub async fn list_active(&self) -> AppResult<Vec<Announcement>> {
        let result = self
            .store
            .list_active(self.clock.now())
            .await
            .map_err(AppError::from);
        metrics::record("list_active", &result);
        result
    }

    pub async fn list_all(&self, username: Option<&str>) -> AppResult<Vec<Announcement>> {
        let result = self.list_all_inner(username).await;
        metrics::record("list_all", &result);
        result
    }

    async fn list_all_inner(&self, username: Option<&str>) -> AppResult<Vec<Announcement>> {
        self.auth.authenticate(username).await?;
        Ok(self.store.list_all().await?)
    }

    pub async fn create(&self, params: AnnouncementParams) -> AppResult<Announcement> {
        let result = self.create_inner(params).await;
        metrics::record("create", &result);
        result
    }

    async fn create_inner(&self, params: AnnouncementParams) -> AppResult<Announcement> {
        let teacher = self.auth.authenticate(params.username.as_deref()).await?;

        let expiration_date = params
            .expiration_date
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| AppError::bad_request("Invalid expiration_date format"))?;
        let start_date = match params.start_date.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw, "start_date")?),
        };
        let message = params
            .message
            .ok_or_else(|| AppError::bad_request("message is required"))?;

        let created = self
            .store
            .insert(NewAnnouncement {
                message,
                start_date,
                expiration_date,
                created_by: teacher.username,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(id = %created.id, created_by = %created.created_by, "announcement created");
        Ok(created)
    }

    pub async fn update(
        &self,
        announcement_id: &str,
        params: AnnouncementParams,
    ) -> AppResult<Announcement> {
        let result = self.update_inner(announcement_id, params).await;
        metrics::record("update", &result);
        result
    }

    async fn update_inner(
        &self,
        announcement_id: &str,
        params: AnnouncementParams,
    ) -> AppResult<Announcement> {
        let teacher = self.auth.authenticate(params.username.as_deref()).await?;
        let id = parse_id(announcement_id)?;

        let existing = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

        let patch = AnnouncementPatch {
            message: params.message,
            start_date: date_update(params.start_date.as_deref(), "start_date")?,
            expiration_date: date_update(params.expiration_date.as_deref(), "expiration_date")?,
        };
        if patch.is_empty() {
            return Ok(existing);
        }

        let updated = self
            .store
            .update(id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

        tracing::info!(%id, username = %teacher.username, "announcement updated");
        Ok(updated)
    }

    pub async fn delete(&self, announcement_id: &str, username: Option<&str>) -> AppResult<()> {
        let result = self.delete_inner(announcement_id, username).await;
        metrics::record("delete", &result);
        result
    }

    async fn delete_inner(&self, announcement_id: &str, username: Option<&str>) -> AppResult<()> {
        let teacher = self.auth.authenticate(username).await?;
        let id = parse_id(announcement_id)?;
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(NOT_FOUND.into()));
        }
        tracing::info!(%id, username = %teacher.username, "announcement deleted");
        Ok(())
    }
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("Invalid announcement ID"))
}

fn parse_date(raw: &str, field: &str) -> AppResult<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| AppError::bad_request(format!("Invalid {field} format")))
}

/// Omitted → keep, empty → clear, anything else must parse.
fn date_update(raw: Option<&str>, field: &str) -> AppResult<FieldUpdate<DateTime<Utc>>> {
    match raw {
        None => Ok(FieldUpdate::Keep),
        Some("") => Ok(FieldUpdate::Clear),
        Some(value) => parse_date(value, field).map(FieldUpdate::Set),
    }
}
