use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AnnouncementStore, TeacherDirectory};
use crate::models::announcement::{Announcement, AnnouncementPatch, NewAnnouncement};
use crate::models::teacher::Teacher;

const COLUMNS: &str = "id, message, start_date, expiration_date, created_by, created_at";

#[derive(Clone)]
pub struct PgAnnouncementStore {
    pool: PgPool,
}

impl PgAnnouncementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnouncementStore for PgAnnouncementStore {
    async fn list_active(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {COLUMNS} FROM announcements
             WHERE (expiration_date IS NULL OR expiration_date >= $1)
               AND (start_date IS NULL OR start_date <= $1)
             ORDER BY created_at DESC"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {COLUMNS} FROM announcements ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {COLUMNS} FROM announcements WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, new: NewAnnouncement) -> anyhow::Result<Announcement> {
        let row = sqlx::query_as::<_, Announcement>(&format!(
            "INSERT INTO announcements
                (message, start_date, expiration_date, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(&new.message)
        .bind(new.start_date)
        .bind(new.expiration_date)
        .bind(&new.created_by)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &AnnouncementPatch,
    ) -> anyhow::Result<Option<Announcement>> {
        let (set_start, start_date) = patch.start_date.as_binds();
        let (set_expiration, expiration_date) = patch.expiration_date.as_binds();

        // Date columns take a "touched" flag so NULL can be written explicitly.
        let row = sqlx::query_as::<_, Announcement>(&format!(
            "UPDATE announcements
             SET message = COALESCE($1, message),
                 start_date = CASE WHEN $2 THEN $3 ELSE start_date END,
                 expiration_date = CASE WHEN $4 THEN $5 ELSE expiration_date END
             WHERE id = $6
             RETURNING {COLUMNS}"
        ))
        .bind(&patch.message)
        .bind(set_start)
        .bind(start_date)
        .bind(set_expiration)
        .bind(expiration_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgTeacherDirectory {
    pool: PgPool,
}

impl PgTeacherDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a teacher, or refresh the display name of an existing one.
    pub async fn upsert(
        &self,
        username: &str,
        display_name: Option<&str>,
    ) -> anyhow::Result<Teacher> {
        let teacher = sqlx::query_as::<_, Teacher>(
            "INSERT INTO teachers (username, display_name)
             VALUES ($1, $2)
             ON CONFLICT (username) DO UPDATE
                SET display_name = COALESCE(EXCLUDED.display_name, teachers.display_name)
             RETURNING username, display_name, created_at",
        )
        .bind(username)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(teacher)
    }
}

#[async_trait]
impl TeacherDirectory for PgTeacherDirectory {
    async fn exists(&self, username: &str) -> anyhow::Result<bool> {
        let found: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM teachers WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(found)
    }
}
