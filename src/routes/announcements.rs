use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    app::AppState,
    error::AppResult,
    models::announcement::Announcement,
    routes::extract::{AnnouncementInput, Username},
};

/// GET /announcements — public, only announcements inside their window.
pub async fn list_active(State(state): State<AppState>) -> AppResult<Json<Vec<Announcement>>> {
    state.announcements.list_active().await.map(Json)
}

/// GET /announcements/all?username= — everything, newest first.
pub async fn list_all(
    State(state): State<AppState>,
    Username(username): Username,
) -> AppResult<Json<Vec<Announcement>>> {
    state
        .announcements
        .list_all(username.as_deref())
        .await
        .map(Json)
}

/// POST /announcements — fields from the query string, or a JSON body.
pub async fn create_announcement(
    State(state): State<AppState>,
    AnnouncementInput(params): AnnouncementInput,
) -> AppResult<Json<Announcement>> {
    state.announcements.create(params).await.map(Json)
}

/// PUT /announcements/{id} — only the supplied fields change.
/// An empty date string clears that date.
pub async fn update_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AnnouncementInput(params): AnnouncementInput,
) -> AppResult<Json<Announcement>> {
    state.announcements.update(&id, params).await.map(Json)
}

/// DELETE /announcements/{id}?username=
pub async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Username(username): Username,
) -> AppResult<Json<Value>> {
    state.announcements.delete(&id, username.as_deref()).await?;
    Ok(Json(json!({ "message": "Announcement deleted successfully" })))
}
