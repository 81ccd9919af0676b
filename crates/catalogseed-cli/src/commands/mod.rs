pub mod preview;
pub mod seed;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};

use catalogseed_core::config::{read_config, resolve_connection_url, CatalogSeedConfig};

use crate::args::ConnectionArgs;

/// Load catalogseed.toml from the working directory, if present.
pub fn load_config() -> Result<Option<CatalogSeedConfig>> {
    read_config(Path::new(".")).context("Failed to load catalogseed.toml")
}

/// Resolve the connection URL from flags/env, then the config file, then defaults.
pub fn resolve_db_url(
    connection: &ConnectionArgs,
    config: Option<&CatalogSeedConfig>,
) -> Result<String> {
    let url = resolve_connection_url(
        &connection.to_database_config(),
        config.map(|c| &c.database),
    )?;
    Ok(url)
}
