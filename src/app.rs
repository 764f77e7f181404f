use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    db::{AnnouncementStore, TeacherDirectory},
    routes,
    services::{
        announcements::AnnouncementService,
        auth::{Authenticator, TeacherPresenceAuthenticator},
        clock::{Clock, SystemClock},
    },
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub announcements: AnnouncementService,
    pub store: Arc<dyn AnnouncementStore>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AnnouncementStore>,
        auth: Arc<dyn Authenticator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            announcements: AnnouncementService::new(store.clone(), auth, clock),
            store,
        }
    }

    /// Presence-check auth against `teachers` and the system clock.
    pub fn with_teacher_directory(
        store: Arc<dyn AnnouncementStore>,
        teachers: Arc<dyn TeacherDirectory>,
    ) -> Self {
        Self::new(
            store,
            Arc::new(TeacherPresenceAuthenticator::new(teachers)),
            Arc::new(SystemClock),
        )
    }
}

pub fn build_router(state: AppState, extra_origin: Option<String>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        .route(
            "/announcements",
            get(routes::announcements::list_active)
                .post(routes::announcements::create_announcement),
        )
        .route("/announcements/all", get(routes::announcements::list_all))
        .route(
            "/announcements/{id}",
            put(routes::announcements::update_announcement)
                .delete(routes::announcements::delete_announcement),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors(extra_origin)),
        )
        .with_state(state)
}

/// Localhost is always allowed for local development, plus one configured origin.
fn cors(extra_origin: Option<String>) -> CorsLayer {
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
            return true;
        }
        extra_origin.as_deref() == Some(o)
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origin)
}
