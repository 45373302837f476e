//! Database primitives: environment-driven settings and pooled connections.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use thiserror::Error;
use tracing::{debug, warn};

/// Shared pooled connection handle.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error("failed to connect to database: {0}")]
    Connect(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    url: Option<String>,
    url_env_key: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            url_env_key: "DATABASE_URL".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Reads `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let url = std::env::var(&defaults.url_env_key).ok();
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        Self {
            url,
            max_connections,
            ..defaults
        }
    }

    pub fn database_url(&self) -> DbResult<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| DbError::MissingUrl(self.url_env_key.clone()))
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let url = settings.database_url()?;
    let mut options = ConnectOptions::new(url.to_string());
    options
        .max_connections(settings.max_connections)
        .connect_timeout(settings.connect_timeout)
        .sqlx_logging(false);
    debug!(max_connections = settings.max_connections, "opening database pool");
    Database::connect(options).await.map_err(Into::into)
}

/// Round-trips `SELECT 1`; used by health checks.
pub async fn ping(pool: &DbPool) -> bool {
    let backend = pool.get_database_backend();
    match pool
        .execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
    {
        Ok(_) => true,
        Err(err) => {
            warn!(error = %err, "database ping failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_is_returned() {
        let settings = DatabaseSettings::new("postgres://hr:hr@localhost/hr");
        assert_eq!(
            settings.database_url().unwrap(),
            "postgres://hr:hr@localhost/hr"
        );
        assert_eq!(settings.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn missing_url_names_the_variable() {
        let err = DatabaseSettings::default().database_url().unwrap_err();
        assert_eq!(err.to_string(), "database url missing (set DATABASE_URL)");
    }

    #[tokio::test]
    async fn ping_succeeds_on_sqlite() {
        let pool = connect(&DatabaseSettings::new("sqlite::memory:"))
            .await
            .unwrap();
        assert!(ping(&pool).await);
    }
}
