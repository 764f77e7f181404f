use std::sync::Arc;

use async_trait::async_trait;

use crate::{db::TeacherDirectory, error::AppError, models::teacher::AuthenticatedTeacher};

/// Decides whether a request's username may manage announcements.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: Option<&str>) -> Result<AuthenticatedTeacher, AppError>;
}

/// Accepts any username that has a teacher record. There is no credential
/// check; swap in another `Authenticator` for real sign-in.
pub struct TeacherPresenceAuthenticator {
    teachers: Arc<dyn TeacherDirectory>,
}

impl TeacherPresenceAuthenticator {
    pub fn new(teachers: Arc<dyn TeacherDirectory>) -> Self {
        Self { teachers }
    }
}

#[async_trait]
impl Authenticator for TeacherPresenceAuthenticator {
    async fn authenticate(&self, username: Option<&str>) -> Result<AuthenticatedTeacher, AppError> {
        let username = username.filter(|u| !u.is_empty()).ok_or(AppError::Unauthorized)?;

        if !self.teachers.exists(username).await? {
            tracing::warn!(username, "rejected: no teacher record");
            return Err(AppError::Unauthorized);
        }

        Ok(AuthenticatedTeacher {
            username: username.to_string(),
        })
    }
}
