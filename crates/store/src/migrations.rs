use sqlx::{Pool, Sqlite};
use tracing::info;

/// Embedded migration scripts
const MIGRATION_001_USERS: &str = include_str!("../migrations/001_users.sql");
const MIGRATION_002_CONVO: &str = include_str!("../migrations/002_convo.sql");
const MIGRATION_003_CONVO_INDEX: &str = include_str!("../migrations/003_convo_index.sql");

/// Run all embedded migrations. Every script is idempotent, so this is
/// safe to call on every startup.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    sqlx::query(MIGRATION_001_USERS).execute(pool).await?;
    sqlx::query(MIGRATION_002_CONVO).execute(pool).await?;
    sqlx::query(MIGRATION_003_CONVO_INDEX).execute(pool).await?;

    info!("All migrations completed successfully");
    Ok(())
}
