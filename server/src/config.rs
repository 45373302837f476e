use anyhow::{Result, bail};
use platform_db::DatabaseSettings;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "postgres" | "postgresql" | "database" => Ok(StoreBackend::Postgres),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown STORE_BACKEND `{other}` (use postgres|memory)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store_backend: StoreBackend,
    pub seed_on_start: bool,
    pub database: DatabaseSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            seed_on_start: true,
            database: DatabaseSettings::default(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let store_backend =
            StoreBackend::parse(&std::env::var("STORE_BACKEND").unwrap_or_default())?;

        // the memory backend starts empty, so it seeds unless told otherwise
        let seed_on_start = env_bool("SEED_ON_START", store_backend == StoreBackend::Memory);

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            store_backend,
            seed_on_start,
            database: DatabaseSettings::from_env(),
            cors_allowed_origins,
        })
    }
}

fn env_bool(var: &str, default: bool) -> bool {
    std::env::var(var)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_parsing() {
        assert_eq!(StoreBackend::parse("").unwrap(), StoreBackend::Postgres);
        assert_eq!(StoreBackend::parse("Memory").unwrap(), StoreBackend::Memory);
        assert!(StoreBackend::parse("mongo").is_err());
    }
}
