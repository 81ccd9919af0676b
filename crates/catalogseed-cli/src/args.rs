use clap::{Args, Parser, Subcommand, ValueEnum};

use catalogseed_core::config::DatabaseConfig;

#[derive(Parser, Debug)]
#[command(
    name = "catalogseed",
    about = "Drop, recreate and populate a product table with synthetic rows",
    version,
    after_help = "Examples:\n  catalogseed seed --db postgres://postgres@localhost:5434/sales_data\n  catalogseed seed --host localhost --port 5434 --user postgres --password secret\n  catalogseed seed --rows 500 --seed 42     # auto-detect DB from .env / catalogseed.toml\n  catalogseed preview --rows 10\n  catalogseed verify --db sqlite://demo.db --format json"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Drop, recreate and populate the product table
    Seed(SeedArgs),

    /// Print sample product names without touching a database
    Preview(PreviewArgs),

    /// Check the product table's row count and name format
    Verify(VerifyArgs),
}

/// Connection flags shared by every command that talks to a database.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Full database connection URL (postgres://, mysql://, sqlite://)
    #[arg(long, env = "DATABASE_URL")]
    pub db: Option<String>,

    /// Database engine when building the URL from parts (postgres, mysql, sqlite)
    #[arg(long, env = "CATALOGSEED_ENGINE")]
    pub engine: Option<String>,

    /// Database host
    #[arg(long, env = "CATALOGSEED_HOST")]
    pub host: Option<String>,

    /// Database port
    #[arg(long, env = "CATALOGSEED_PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Database name (file path for SQLite)
    #[arg(long, env = "CATALOGSEED_DATABASE")]
    pub database: Option<String>,

    /// Database user
    #[arg(long, env = "CATALOGSEED_USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(long, env = "CATALOGSEED_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Number of products to insert [default: 10000]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub rows: Option<u64>,

    /// Random seed for reproducible product names
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Number of sample names to print
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    pub rows: u64,

    /// Random seed for reproducible product names
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Expected row count; omit to skip the count check
    #[arg(long)]
    pub rows: Option<usize>,

    /// Output format for the report
    #[arg(long, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ConnectionArgs {
    /// The CLI layer of connection settings.
    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.db.clone(),
            engine: self.engine.clone(),
            host: self.host.clone(),
            port: self.port,
            name: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}
