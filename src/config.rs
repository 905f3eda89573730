use anyhow::{Context, Result};
use config::{Config, ConfigError, Environment, File};
use sea_orm::Database;
use serde::Deserialize;
use std::time::Duration;
use crate::schemas::AppState;

/// Runtime settings, layered from built-in defaults, an optional
/// `inventory.{toml,yaml,json}` file in the working directory and the
/// environment (`DATABASE_URL`, `BIND_ADDRESS`, `REQUEST_TIMEOUT_SECS`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .set_default("database_url", "sqlite://inventory.db?mode=rwc")?
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("request_timeout_secs", 30)?
            .add_source(File::with_name("inventory").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Settings with command-line overrides applied on top.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Connect to the database and build the state shared by all handlers
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;

    Ok(AppState { db })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_only_given_values() {
        let settings = Settings {
            database_url: "sqlite://inventory.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
        };

        let settings = settings.with_overrides(None, Some("127.0.0.1:8080".to_string()));

        assert_eq!(settings.database_url, "sqlite://inventory.db?mode=rwc");
        assert_eq!(settings.bind_address, "127.0.0.1:8080");
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }
}
