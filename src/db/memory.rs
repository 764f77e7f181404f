use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AnnouncementStore, TeacherDirectory};
use crate::models::announcement::{Announcement, AnnouncementPatch, NewAnnouncement};

/// Process-local announcement store, used by `STORAGE_BACKEND=memory` and tests.
#[derive(Default)]
pub struct MemoryAnnouncementStore {
    // Insertion sequence breaks `created_at` ties so ordering stays stable.
    rows: RwLock<HashMap<Uuid, (u64, Announcement)>>,
    next_seq: RwLock<u64>,
}

impl MemoryAnnouncementStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn sorted(&self, keep: impl Fn(&Announcement) -> bool) -> Vec<Announcement> {
        let rows = self.rows.read().await;
        let mut items: Vec<&(u64, Announcement)> = rows.values().filter(|(_, a)| keep(a)).collect();
        items.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        items.into_iter().map(|(_, a)| a.clone()).collect()
    }
}

#[async_trait]
impl AnnouncementStore for MemoryAnnouncementStore {
    async fn list_active(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Announcement>> {
        Ok(self.sorted(|a| a.is_active_at(now)).await)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Announcement>> {
        Ok(self.sorted(|_| true).await)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Announcement>> {
        Ok(self.rows.read().await.get(&id).map(|(_, a)| a.clone()))
    }

    async fn insert(&self, new: NewAnnouncement) -> anyhow::Result<Announcement> {
        let announcement = Announcement {
            id: Uuid::new_v4(),
            message: new.message,
            start_date: new.start_date,
            expiration_date: Some(new.expiration_date),
            created_by: new.created_by,
            created_at: new.created_at,
        };
        let mut seq = self.next_seq.write().await;
        *seq += 1;
        self.rows
            .write()
            .await
            .insert(announcement.id, (*seq, announcement.clone()));
        Ok(announcement)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &AnnouncementPatch,
    ) -> anyhow::Result<Option<Announcement>> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&id).map(|(_, a)| {
            patch.apply_to(a);
            a.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Fixed set of teacher usernames, seeded at startup.
#[derive(Default)]
pub struct MemoryTeacherDirectory {
    usernames: HashSet<String>,
}

impl MemoryTeacherDirectory {
    pub fn with_usernames<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            usernames: usernames.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TeacherDirectory for MemoryTeacherDirectory {
    async fn exists(&self, username: &str) -> anyhow::Result<bool> {
        Ok(self.usernames.contains(username))
    }
}
