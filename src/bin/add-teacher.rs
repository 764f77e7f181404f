//! Register a teacher so the presence check lets them manage announcements.
//!
//! Usage: add-teacher --username NAME [--display-name "Full Name"]
//!   Re-running for an existing username only refreshes the display name.

use announcements_api::db::{self, postgres::PgTeacherDirectory};
use clap::Parser;

#[derive(Parser)]
#[command(name = "add-teacher", about = "Register a teacher in the announcements database")]
struct Args {
    /// Username the teacher passes as `username` to the API
    #[arg(long)]
    username: String,

    /// Human-readable name, stored for administration only
    #[arg(long)]
    display_name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?;

    let pool = db::create_pool(&database_url, 2).await?;
    db::run_migrations(&pool).await?;

    let teacher = PgTeacherDirectory::new(pool)
        .upsert(args.username.trim(), args.display_name.as_deref())
        .await?;

    tracing::info!(
        "Teacher registered: {} ({})",
        teacher.username,
        teacher.display_name.as_deref().unwrap_or("no display name")
    );

    Ok(())
}
