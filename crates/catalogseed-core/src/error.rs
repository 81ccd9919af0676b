//! # Error Types
//!
//! Defines `SeedError`, the unified error enum for every failure mode in
//! catalogseed. Database failures carry the step they happened in and a
//! truncated SQL preview, and connection failures carry a password-masked
//! URL, so a single line of output is enough to debug a failed run.

use thiserror::Error;

use crate::seeder::Step;

/// All errors that can occur in catalogseed operations.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Database connection failed: {message}\n  Connection string: {connection_hint}\n  Cause: {source}")]
    Connection {
        message: String,
        connection_hint: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Unsupported database scheme '{scheme}'. Supported: postgres://, mysql://, sqlite://")]
    UnsupportedDatabase { scheme: String },

    #[error("{step} failed: {source}\n  SQL: {sql_preview}")]
    Statement {
        step: Step,
        sql_preview: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Query failed: {source}\n  SQL: {sql_preview}")]
    Query {
        sql_preview: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid connection URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, SeedError>;
