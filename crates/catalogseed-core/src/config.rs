//! # Configuration
//!
//! Reads `catalogseed.toml`, the optional file that supplies connection
//! parameters and seeding defaults without CLI flags, and resolves the final
//! connection URL from the layers in priority order:
//!
//! 1. a full URL (`--db` / `DATABASE_URL`)
//! 2. per-field flags (`--host`, `--port`, ... / `CATALOGSEED_*` env vars)
//! 3. `catalogseed.toml` `[database]`
//! 4. built-in defaults
//!
//! Example `catalogseed.toml`:
//!
//! ```toml
//! [database]
//! engine = "postgres"
//! host = "localhost"
//! port = 5434
//! name = "sales_data"
//! user = "postgres"
//! password = "secret"
//!
//! [seed]
//! rows = 10000
//! seed = 42
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SeedError};
use crate::schema::DatabaseType;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "catalogseed.toml";

/// Number of products inserted per run unless overridden.
pub const DEFAULT_ROW_COUNT: usize = 10_000;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_DATABASE: &str = "sales_data";
pub const DEFAULT_USER: &str = "postgres";

/// Top-level catalogseed.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSeedConfig {
    /// Connection settings.
    pub database: DatabaseConfig,
    /// Seeding defaults.
    pub seed: SeedConfig,
}

/// Connection parameters. Every field is optional so that layers can be
/// merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL; wins over the individual fields of the same layer.
    pub url: Option<String>,
    /// `postgres`, `mysql` or `sqlite`.
    pub engine: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Database name, or the file path for SQLite.
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Number of products to insert.
    pub rows: Option<usize>,
    /// Fixed random seed for reproducible names.
    pub seed: Option<u64>,
}

/// Read and parse a catalogseed.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed.
pub fn read_config(dir: &Path) -> Result<Option<CatalogSeedConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| SeedError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let config: CatalogSeedConfig = toml::from_str(&content).map_err(|e| SeedError::Config {
        message: format!("Failed to parse {}: {}", path.display(), e),
    })?;

    config.validate()?;

    Ok(Some(config))
}

impl CatalogSeedConfig {
    /// Reject values serde accepts but a run cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.seed.rows == Some(0) {
            return Err(SeedError::Config {
                message: "[seed] rows must be at least 1".to_string(),
            });
        }
        self.database.validate()
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.port == Some(0) {
            return Err(SeedError::Config {
                message: "[database] port must be between 1 and 65535".to_string(),
            });
        }
        if let Some(ref engine) = self.engine {
            engine.parse::<DatabaseType>().map_err(|e| SeedError::Config {
                message: format!("[database] engine: {}", e),
            })?;
        }
        Ok(())
    }

    /// True if any individual connection field is set.
    pub fn has_parts(&self) -> bool {
        self.engine.is_some()
            || self.host.is_some()
            || self.port.is_some()
            || self.name.is_some()
            || self.user.is_some()
            || self.password.is_some()
    }

    /// Field-wise merge: values from `self` win, gaps are filled from `lower`.
    pub fn merged_over(&self, lower: &DatabaseConfig) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone().or_else(|| lower.url.clone()),
            engine: self.engine.clone().or_else(|| lower.engine.clone()),
            host: self.host.clone().or_else(|| lower.host.clone()),
            port: self.port.or(lower.port),
            name: self.name.clone().or_else(|| lower.name.clone()),
            user: self.user.clone().or_else(|| lower.user.clone()),
            password: self.password.clone().or_else(|| lower.password.clone()),
        }
    }

    /// Build a connection URL from the individual fields, applying defaults.
    pub fn build_url(&self) -> Result<String> {
        let db_type: DatabaseType = self
            .engine
            .as_deref()
            .unwrap_or("postgres")
            .parse()?;
        let name = self.name.as_deref().unwrap_or(DEFAULT_DATABASE);

        if db_type == DatabaseType::SQLite {
            return Ok(format!("sqlite://{}?mode=rwc", name));
        }

        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let invalid = |message: &str| SeedError::InvalidUrl {
            url: format!("{}://{}/{}", db_type.scheme(), host, name),
            message: message.to_string(),
        };

        let mut url = url::Url::parse(&format!("{}://{}", db_type.scheme(), DEFAULT_HOST))
            .map_err(|e| invalid(&e.to_string()))?;
        url.set_host(Some(host))
            .map_err(|e| invalid(&e.to_string()))?;
        url.set_port(self.port.or(db_type.default_port()))
            .map_err(|_| invalid("cannot set port"))?;
        url.set_username(self.user.as_deref().unwrap_or(DEFAULT_USER))
            .map_err(|_| invalid("cannot set user"))?;
        if let Some(ref password) = self.password {
            url.set_password(Some(password))
                .map_err(|_| invalid("cannot set password"))?;
        }
        url.set_path(&format!("/{}", name));

        Ok(url.to_string())
    }
}

/// Resolve the connection URL from CLI-provided settings and the config file.
///
/// A full URL on the CLI layer wins outright. Individual CLI fields are merged
/// over the file's fields; the file's own URL is only used when the CLI gave
/// no connection fields at all.
pub fn resolve_connection_url(cli: &DatabaseConfig, file: Option<&DatabaseConfig>) -> Result<String> {
    cli.validate()?;
    if let Some(ref url) = cli.url {
        return Ok(url.clone());
    }

    let empty = DatabaseConfig::default();
    let file = file.unwrap_or(&empty);
    if !cli.has_parts() {
        if let Some(ref url) = file.url {
            return Ok(url.clone());
        }
    }

    cli.merged_over(file).build_url()
}
