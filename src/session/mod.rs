//! Local session persistence.
//!
//! Single-slot SQLite store keeping the logged-in session (token plus staff
//! user) between app launches.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

use crate::errors::AppError;
use crate::models::{LoginSession, StaffUser};

/// Initialize the session database and run migrations.
pub async fn init_store(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            token TEXT NOT NULL,
            user TEXT NOT NULL,
            saved_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Store for the single persisted login session.
#[derive(Clone)]
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist the session, replacing any previous one.
    pub async fn save(&self, session: &LoginSession) -> Result<(), AppError> {
        let user_json = serde_json::to_string(&session.user)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO session (id, token, user, saved_at) VALUES (1, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET token = excluded.token, user = excluded.user, saved_at = excluded.saved_at",
        )
        .bind(&session.token)
        .bind(&user_json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Load the persisted session, if any.
    pub async fn load(&self) -> Result<Option<LoginSession>, AppError> {
        let row = sqlx::query("SELECT token, user FROM session WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let token: String = row.get("token");
                let user_json: String = row.get("user");
                let user: StaffUser = serde_json::from_str(&user_json)?;
                Ok(Some(LoginSession { token, user }))
            }
            None => Ok(None),
        }
    }

    /// Drop the persisted session (logout).
    pub async fn clear(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM session WHERE id = 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
