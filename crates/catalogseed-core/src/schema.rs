//! # Product Table Schema
//!
//! The single `product` table and the per-engine SQL used to drop, create
//! and fill it. `product_id` is always engine-assigned; the seeder only ever
//! writes `product_name`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedError};

/// Name of the seeded table.
pub const PRODUCT_TABLE: &str = "product";

/// Auto-incrementing primary key column.
pub const PRODUCT_ID_COLUMN: &str = "product_id";

/// Required text column holding `<word> <category>`.
pub const PRODUCT_NAME_COLUMN: &str = "product_name";

/// Maximum length of `product_name`.
pub const PRODUCT_NAME_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseType {
    PostgreSQL,
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// URL scheme used when building a connection URL from parts.
    pub fn scheme(&self) -> &'static str {
        match self {
            DatabaseType::PostgreSQL => "postgres",
            DatabaseType::MySQL => "mysql",
            DatabaseType::SQLite => "sqlite",
        }
    }

    /// Port the engine listens on out of the box.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            DatabaseType::PostgreSQL => Some(5432),
            DatabaseType::MySQL => Some(3306),
            DatabaseType::SQLite => None,
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseType::PostgreSQL => write!(f, "PostgreSQL"),
            DatabaseType::MySQL => write!(f, "MySQL"),
            DatabaseType::SQLite => write!(f, "SQLite"),
        }
    }
}

impl std::str::FromStr for DatabaseType {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DatabaseType::PostgreSQL),
            "mysql" | "mariadb" => Ok(DatabaseType::MySQL),
            "sqlite" | "file" => Ok(DatabaseType::SQLite),
            other => Err(SeedError::UnsupportedDatabase {
                scheme: other.to_string(),
            }),
        }
    }
}

/// Determine the database type from a connection URL.
pub fn database_type_from_url(url: &str) -> Result<DatabaseType> {
    let scheme = url.split("://").next().unwrap_or("");
    // "sqlite::memory:" has no "//"
    let scheme = scheme.split(':').next().unwrap_or("");
    scheme.parse()
}

/// `DROP TABLE IF EXISTS` for the product table.
pub fn drop_table_sql(db_type: DatabaseType) -> String {
    format!(
        "DROP TABLE IF EXISTS {}",
        quote_identifier(PRODUCT_TABLE, db_type)
    )
}

/// `CREATE TABLE` for the product table in the engine's dialect.
pub fn create_table_sql(db_type: DatabaseType) -> String {
    let id_definition = match db_type {
        DatabaseType::PostgreSQL => "SERIAL PRIMARY KEY",
        DatabaseType::MySQL => "INT AUTO_INCREMENT PRIMARY KEY",
        DatabaseType::SQLite => "INTEGER PRIMARY KEY AUTOINCREMENT",
    };
    format!(
        "CREATE TABLE {} ({} {}, {} VARCHAR({}) NOT NULL)",
        quote_identifier(PRODUCT_TABLE, db_type),
        quote_identifier(PRODUCT_ID_COLUMN, db_type),
        id_definition,
        quote_identifier(PRODUCT_NAME_COLUMN, db_type),
        PRODUCT_NAME_MAX_LENGTH,
    )
}

/// `SELECT` returning every product name, in insertion order.
pub fn select_names_sql(db_type: DatabaseType) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        quote_identifier(PRODUCT_NAME_COLUMN, db_type),
        quote_identifier(PRODUCT_TABLE, db_type),
        quote_identifier(PRODUCT_ID_COLUMN, db_type),
    )
}

/// Build a multi-row INSERT for the given product names.
///
/// Produces: `INSERT INTO "product" ("product_name") VALUES ('a cars'), ('b toys')`
pub fn build_batched_insert<S: AsRef<str>>(names: &[S], db_type: DatabaseType) -> String {
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ",
        quote_identifier(PRODUCT_TABLE, db_type),
        quote_identifier(PRODUCT_NAME_COLUMN, db_type),
    );

    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        sql.push_str(&string_literal(name.as_ref(), db_type));
        sql.push(')');
    }

    sql
}

/// Quote a SQL identifier based on database type.
pub fn quote_identifier(name: &str, db_type: DatabaseType) -> String {
    match db_type {
        DatabaseType::MySQL => format!("`{}`", name),
        _ => format!("\"{}\"", name),
    }
}

/// Render a string as an escaped SQL literal.
///
/// MySQL treats backslash as an escape character inside literals by default,
/// so it is doubled there as well. This assumes the server's default
/// `sql_mode`: with `NO_BACKSLASH_ESCAPES` set, a doubled backslash is stored
/// as two characters.
pub fn string_literal(value: &str, db_type: DatabaseType) -> String {
    let escaped = value.replace('\'', "''");
    match db_type {
        DatabaseType::MySQL => format!("'{}'", escaped.replace('\\', "\\\\")),
        _ => format!("'{}'", escaped),
    }
}

/// Truncate a SQL string for error messages.
pub fn truncate_sql(sql: &str, max_len: usize) -> String {
    if sql.len() <= max_len {
        return sql.to_string();
    }
    let mut end = max_len;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &sql[..end])
}
