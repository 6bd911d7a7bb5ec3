use crate::{config::AppConfig, db};
use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Opens the store and applies the schema.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config).await?;
        db::create_schema(&db).await?;
        Ok(Self::from_parts(db, Arc::new(config)))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// Waits for checked-out sessions to come back, then closes every connection.
    pub async fn close(&self) {
        self.db.close().await;
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by a fresh database file inside `dir`.
    pub async fn fake(dir: &std::path::Path, duplicate: crate::config::DuplicateEmailStatus) -> Self {
        let config = AppConfig {
            database_url: format!("sqlite://{}", dir.join("users.db").display()),
            duplicate_email: duplicate,
            ..AppConfig::default()
        };
        Self::init(config).await.expect("test state")
    }
}
