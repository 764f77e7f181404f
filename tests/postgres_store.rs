use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use announcements_api::db::postgres::{PgAnnouncementStore, PgTeacherDirectory};
use announcements_api::db::{self, AnnouncementStore, TeacherDirectory};
use announcements_api::models::announcement::{AnnouncementPatch, FieldUpdate, NewAnnouncement};

// These run against a real PostgreSQL. Without DATABASE_URL (or with
// SKIP_DB_TESTS set) they pass without doing anything.
async fn pool() -> anyhow::Result<Option<PgPool>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL missing; skipping PostgreSQL store tests");
        return Ok(None);
    };
    let pool = db::create_pool(&url, 2).await?;
    db::run_migrations(&pool).await?;
    Ok(Some(pool))
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn new_announcement(
    message: &str,
    start_date: Option<DateTime<Utc>>,
    expiration_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> NewAnnouncement {
    NewAnnouncement {
        message: message.into(),
        start_date,
        expiration_date,
        created_by: "pg-test".into(),
        created_at,
    }
}

async fn cleanup(store: &PgAnnouncementStore, ids: &[Uuid]) -> anyhow::Result<()> {
    for id in ids {
        store.delete(*id).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_update_keeps_clears_and_sets_dates() -> anyhow::Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let store = PgAnnouncementStore::new(pool);

    let start = at(2030, 1, 1, 0);
    let expiration = at(2030, 2, 1, 0);
    let created = store
        .insert(new_announcement("Exam", Some(start), expiration, at(2030, 1, 1, 0)))
        .await?;

    // Clearing one date leaves the other and the message untouched.
    let patch = AnnouncementPatch {
        start_date: FieldUpdate::Clear,
        ..Default::default()
    };
    let updated = store.update(created.id, &patch).await?.expect("row exists");
    assert_eq!(updated.message, "Exam");
    assert_eq!(updated.start_date, None);
    assert_eq!(updated.expiration_date, Some(expiration));

    let new_start = at(2030, 3, 1, 0);
    let new_expiration = at(2030, 4, 1, 0);
    let patch = AnnouncementPatch {
        message: Some("Exam moved".into()),
        start_date: FieldUpdate::Set(new_start),
        expiration_date: FieldUpdate::Set(new_expiration),
    };
    let updated = store.update(created.id, &patch).await?.expect("row exists");
    assert_eq!(updated.message, "Exam moved");
    assert_eq!(updated.start_date, Some(new_start));
    assert_eq!(updated.expiration_date, Some(new_expiration));

    let patch = AnnouncementPatch {
        expiration_date: FieldUpdate::Clear,
        ..Default::default()
    };
    let updated = store.update(created.id, &patch).await?.expect("row exists");
    assert_eq!(updated.start_date, Some(new_start));
    assert_eq!(updated.expiration_date, None);
    assert_eq!(store.find(created.id).await?, Some(updated));

    assert!(store.update(Uuid::new_v4(), &patch).await?.is_none());

    cleanup(&store, &[created.id]).await
}

#[tokio::test]
async fn test_list_active_window_filter() -> anyhow::Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let store = PgAnnouncementStore::new(pool);
    let now = at(2030, 6, 1, 12);
    let day = Duration::days(1);

    let live = store
        .insert(new_announcement("live", Some(now - day), now + day, now - day))
        .await?;
    let expires_now = store
        .insert(new_announcement("expires-now", None, now, now - day * 2))
        .await?;
    let expired = store
        .insert(new_announcement("expired", None, now - day, now - day * 3))
        .await?;
    let pending = store
        .insert(new_announcement("pending", Some(now + day), now + day * 2, now - day * 5))
        .await?;
    let open_ended = store
        .insert(new_announcement("open-ended", None, now + day, now - day * 4))
        .await?;
    let clear_expiration = AnnouncementPatch {
        expiration_date: FieldUpdate::Clear,
        ..Default::default()
    };
    store.update(open_ended.id, &clear_expiration).await?;

    let ours = [live.id, expires_now.id, expired.id, pending.id, open_ended.id];
    let active: Vec<Uuid> = store
        .list_active(now)
        .await?
        .into_iter()
        .map(|a| a.id)
        .filter(|id| ours.contains(id))
        .collect();
    assert_eq!(active, vec![live.id, expires_now.id, open_ended.id]);

    let all: Vec<Uuid> = store
        .list_all()
        .await?
        .into_iter()
        .map(|a| a.id)
        .filter(|id| ours.contains(id))
        .collect();
    assert_eq!(all, vec![live.id, expires_now.id, expired.id, open_ended.id, pending.id]);

    cleanup(&store, &ours).await
}

#[tokio::test]
async fn test_delete_reports_missing_row() -> anyhow::Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let store = PgAnnouncementStore::new(pool);

    let created = store
        .insert(new_announcement("bye", None, at(2030, 2, 1, 0), at(2030, 1, 1, 0)))
        .await?;
    assert!(store.delete(created.id).await?);
    assert!(!store.delete(created.id).await?);
    assert_eq!(store.find(created.id).await?, None);
    store.ping().await
}

#[tokio::test]
async fn test_teacher_upsert_and_exists() -> anyhow::Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let teachers = PgTeacherDirectory::new(pool.clone());
    let username = format!("teacher-{}", Uuid::new_v4());

    assert!(!teachers.exists(&username).await?);

    let teacher = teachers.upsert(&username, Some("Ms. Rivera")).await?;
    assert_eq!(teacher.username, username);
    assert_eq!(teacher.display_name.as_deref(), Some("Ms. Rivera"));
    assert!(teachers.exists(&username).await?);

    // A second upsert without a name keeps the stored one.
    let teacher = teachers.upsert(&username, None).await?;
    assert_eq!(teacher.display_name.as_deref(), Some("Ms. Rivera"));

    sqlx::query("DELETE FROM teachers WHERE username = $1")
        .bind(&username)
        .execute(&pool)
        .await?;
    assert!(!teachers.exists(&username).await?);
    Ok(())
}
