pub mod migrations;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use lana_models::{ChatMessage, ChatRole, DataConfig, LanaError, UserProfile};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{info, warn};

/// SQLite-backed store for user quotas and conversation history.
///
/// `connect` prefers the configured database file but degrades to an
/// in-memory database when the file cannot be opened (read-only
/// filesystems, broken volume mounts). In-memory data lives until the
/// process exits.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(data: &DataConfig) -> Result<Self, LanaError> {
        match Self::connect_file(data).await {
            Ok(store) => {
                info!("Database connected: {}", data.db_url);
                Ok(store)
            }
            Err(e) => {
                warn!(
                    "Failed to open {} ({}). Falling back to in-memory store; data persists until process exit.",
                    data.db_url, e
                );
                Self::connect_memory().await
            }
        }
    }

    async fn connect_file(data: &DataConfig) -> Result<Self, LanaError> {
        if !data.dir.is_empty() {
            fs::create_dir_all(&data.dir)?;
        }
        let db_path = data
            .db_url
            .strip_prefix("sqlite://")
            .or_else(|| data.db_url.strip_prefix("sqlite:"));
        if let Some(path) = db_path {
            if let Some(parent) = Path::new(path).parent() {
                fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&data.db_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }

    /// A single-connection pool keeps one `:memory:` database alive for
    /// the whole process; more connections would each get their own.
    pub async fn connect_memory() -> Result<Self, LanaError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), LanaError> {
        migrations::run_migrations(&self.pool).await?;
        Ok(())
    }

    /// Insert-or-fetch the user row, applying the daily quota reset when
    /// the stored date is not `today`.
    pub async fn ensure_user(
        &self,
        user_id: i64,
        username: Option<&str>,
        today: NaiveDate,
    ) -> Result<UserProfile, LanaError> {
        let row = sqlx::query(
            "SELECT user_id, username, messages_today, last_reset FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let today_str = today.to_string();
        match row {
            None => {
                sqlx::query(
                    "INSERT INTO users (user_id, username, messages_today, last_reset) VALUES (?, ?, 0, ?)",
                )
                .bind(user_id)
                .bind(username)
                .bind(&today_str)
                .execute(&self.pool)
                .await?;
                Ok(UserProfile {
                    user_id,
                    username: username.map(str::to_string),
                    messages_today: 0,
                    last_reset: Some(today),
                })
            }
            Some(row) => {
                let stored_username: Option<String> = row.try_get("username")?;
                let messages_today: i64 = row.try_get("messages_today")?;
                let last_reset: Option<String> = row.try_get("last_reset")?;

                if last_reset.as_deref() != Some(today_str.as_str()) {
                    sqlx::query(
                        "UPDATE users SET messages_today = 0, last_reset = ? WHERE user_id = ?",
                    )
                    .bind(&today_str)
                    .bind(user_id)
                    .execute(&self.pool)
                    .await?;
                    return Ok(UserProfile {
                        user_id,
                        username: stored_username,
                        messages_today: 0,
                        last_reset: Some(today),
                    });
                }

                Ok(UserProfile {
                    user_id,
                    username: stored_username,
                    messages_today,
                    last_reset: last_reset.as_deref().and_then(|d| d.parse().ok()),
                })
            }
        }
    }

    /// Count one message against the user's daily quota.
    pub async fn count_message(&self, user_id: i64) -> Result<(), LanaError> {
        sqlx::query(
            "UPDATE users SET messages_today = COALESCE(messages_today, 0) + 1 WHERE user_id = ?",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Append a convo row and trim the user's history down to the newest
    /// `keep_rows` rows.
    pub async fn append(
        &self,
        user_id: i64,
        role: ChatRole,
        content: &str,
        keep_rows: i64,
    ) -> Result<(), LanaError> {
        sqlx::query("INSERT INTO convo (user_id, role, content) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(role.as_str())
            .bind(content)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "DELETE FROM convo WHERE id IN (
                SELECT id FROM convo WHERE user_id = ? ORDER BY id DESC LIMIT -1 OFFSET ?
            )",
        )
        .bind(user_id)
        .bind(keep_rows)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All surviving convo rows for the user, oldest first.
    pub async fn history(&self, user_id: i64) -> Result<Vec<ChatMessage>, LanaError> {
        let rows =
            sqlx::query("SELECT role, content FROM convo WHERE user_id = ? ORDER BY id ASC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|row| {
                let role: String = row.try_get("role")?;
                let content: String = row.try_get("content")?;
                let role = ChatRole::parse(&role).ok_or_else(|| LanaError::Database {
                    reason: format!("unknown chat role '{role}' in convo table"),
                })?;
                Ok(ChatMessage { role, content })
            })
            .collect()
    }

    pub async fn clear_history(&self, user_id: i64) -> Result<(), LanaError> {
        sqlx::query("DELETE FROM convo WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
