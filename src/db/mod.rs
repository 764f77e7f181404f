pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::announcement::{Announcement, AnnouncementPatch, NewAnnouncement};

/// Persistence for the `announcements` collection. Every method is a single
/// store operation.
#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    /// Announcements visible at `now`, newest first.
    async fn list_active(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Announcement>>;
    /// Every announcement, newest first.
    async fn list_all(&self) -> anyhow::Result<Vec<Announcement>>;
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Announcement>>;
    async fn insert(&self, new: NewAnnouncement) -> anyhow::Result<Announcement>;
    /// Returns `None` when no row has this id.
    async fn update(
        &self,
        id: Uuid,
        patch: &AnnouncementPatch,
    ) -> anyhow::Result<Option<Announcement>>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn ping(&self) -> anyhow::Result<()>;
}

/// Read-only view of the `teachers` collection.
#[async_trait]
pub trait TeacherDirectory: Send + Sync {
    async fn exists(&self, username: &str) -> anyhow::Result<bool>;
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the migrations embedded from ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
