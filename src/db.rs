use std::{
    ops::{Deref, DerefMut},
    str::FromStr,
};

use anyhow::Context;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqliteConnection, SqlitePool,
};
use tracing::{error, info};

use crate::{config::AppConfig, error::ApiError};

/// Table definition for the `users` entity. Applied once at startup; there is
/// no migration path for later changes.
pub const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id    INTEGER NOT NULL PRIMARY KEY,
        name  VARCHAR(100) NOT NULL,
        email VARCHAR(100) NOT NULL UNIQUE,
        role  VARCHAR(100) NOT NULL
    )
"#;

/// Opens (creating if absent) the SQLite file named by `database_url`.
pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("parse DATABASE_URL {}", config.database_url))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .context("connect to database")?;

    info!(url = %config.database_url, "database opened");
    Ok(pool)
}

pub async fn create_schema(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(CREATE_USERS_TABLE)
        .execute(db)
        .await
        .context("create users table")?;
    info!("schema ready");
    Ok(())
}

/// A pooled connection held for the lifetime of one request. Dropping it
/// returns the connection to the pool, so release happens on every exit path.
pub struct DbSession(pub PoolConnection<Sqlite>);

#[async_trait]
impl<S> FromRequestParts<S> for DbSession
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = SqlitePool::from_ref(state);
        let conn = pool.acquire().await.map_err(|e| {
            error!(error = %e, "acquire db session failed");
            ApiError::Internal
        })?;
        Ok(Self(conn))
    }
}

impl Deref for DbSession {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
