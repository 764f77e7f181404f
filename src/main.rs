use std::sync::Arc;

use announcements_api::{
    app::{build_router, AppState},
    config::{Config, StorageBackend},
    db::{
        self,
        memory::{MemoryAnnouncementStore, MemoryTeacherDirectory},
        postgres::{PgAnnouncementStore, PgTeacherDirectory},
        AnnouncementStore, TeacherDirectory,
    },
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let (store, teachers): (Arc<dyn AnnouncementStore>, Arc<dyn TeacherDirectory>) =
        match config.storage_backend {
            StorageBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("Missing required env var: DATABASE_URL"))?;
                let pool = db::create_pool(url, config.database_max_connections).await?;
                db::run_migrations(&pool).await?;
                info!("Database connected and migrations applied");
                let store: Arc<dyn AnnouncementStore> =
                    Arc::new(PgAnnouncementStore::new(pool.clone()));
                let teachers: Arc<dyn TeacherDirectory> = Arc::new(PgTeacherDirectory::new(pool));
                (store, teachers)
            }
            StorageBackend::Memory => {
                info!(
                    "In-memory store, {} seeded teacher(s); data is lost on exit",
                    config.seed_teachers.len()
                );
                let store: Arc<dyn AnnouncementStore> = Arc::new(MemoryAnnouncementStore::new());
                let teachers: Arc<dyn TeacherDirectory> =
                    Arc::new(MemoryTeacherDirectory::with_usernames(config.seed_teachers.clone()));
                (store, teachers)
            }
        };

    let state = AppState::with_teacher_directory(store, teachers);
    let app = build_router(state, config.cors_allowed_origin.clone());

    let addr = format!("{}:{}", config.host, config.port);
    info!("announcements API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
