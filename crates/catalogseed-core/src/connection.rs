//! # Database Connection
//!
//! One live connection per run, held as a [`SeedConnection`]. It is a single
//! connection rather than a pool: the seeder runs strictly sequentially and
//! must release exactly one handle when it is done.
//!
//! Statements are sent as raw SQL inside an explicit transaction. On error the
//! transaction is rolled back before the error is returned, so a failed step
//! never leaves partial writes behind.

use sqlx::mysql::MySqlConnection;
use sqlx::postgres::PgConnection;
use sqlx::sqlite::SqliteConnection;
use sqlx::{Connection, Database, Executor};

use crate::error::{Result, SeedError};
use crate::schema::{database_type_from_url, DatabaseType};

/// An open connection to one of the supported engines.
#[derive(Debug)]
pub enum SeedConnection {
    Postgres(PgConnection),
    MySql(MySqlConnection),
    Sqlite(SqliteConnection),
}

impl SeedConnection {
    /// Connect to the database named by `db_url`.
    pub async fn connect(db_url: &str) -> Result<Self> {
        let db_type = database_type_from_url(db_url)?;
        let connection_error = |e: sqlx::Error| SeedError::Connection {
            message: format!("Failed to connect to {}", db_type),
            connection_hint: sanitize_url(db_url),
            source: e,
        };

        let conn = match db_type {
            DatabaseType::PostgreSQL => SeedConnection::Postgres(
                PgConnection::connect(db_url).await.map_err(connection_error)?,
            ),
            DatabaseType::MySQL => SeedConnection::MySql(
                MySqlConnection::connect(db_url)
                    .await
                    .map_err(connection_error)?,
            ),
            DatabaseType::SQLite => SeedConnection::Sqlite(
                SqliteConnection::connect(db_url)
                    .await
                    .map_err(connection_error)?,
            ),
        };

        tracing::debug!("Connected to {} at {}", db_type, sanitize_url(db_url));
        Ok(conn)
    }

    pub fn database_type(&self) -> DatabaseType {
        match self {
            SeedConnection::Postgres(_) => DatabaseType::PostgreSQL,
            SeedConnection::MySql(_) => DatabaseType::MySQL,
            SeedConnection::Sqlite(_) => DatabaseType::SQLite,
        }
    }

    /// Run `statements` in order inside one transaction.
    ///
    /// Commits only if every statement succeeds. On the first failure the
    /// transaction is rolled back and the failing statement is returned with
    /// the error.
    pub async fn execute_in_transaction<I, S>(
        &mut self,
        statements: I,
    ) -> std::result::Result<(), StatementError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.execute_in_transaction_with(statements, |_| {}).await
    }

    /// Like [`execute_in_transaction`](Self::execute_in_transaction), calling
    /// `on_executed` with the statement index after each one succeeds.
    ///
    /// `statements` is consumed lazily, so callers can generate each
    /// statement only when it is about to run.
    pub async fn execute_in_transaction_with<I, S, F>(
        &mut self,
        statements: I,
        on_executed: F,
    ) -> std::result::Result<(), StatementError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(usize),
    {
        match self {
            SeedConnection::Postgres(conn) => {
                run_transaction::<sqlx::Postgres, _, _, _>(conn, statements, on_executed).await
            }
            SeedConnection::MySql(conn) => {
                run_transaction::<sqlx::MySql, _, _, _>(conn, statements, on_executed).await
            }
            SeedConnection::Sqlite(conn) => {
                run_transaction::<sqlx::Sqlite, _, _, _>(conn, statements, on_executed).await
            }
        }
    }

    /// Fetch every row of a single-text-column query.
    pub async fn fetch_strings(&mut self, sql: &str) -> std::result::Result<Vec<String>, sqlx::Error> {
        match self {
            SeedConnection::Postgres(conn) => {
                sqlx::query_scalar::<_, String>(sql).fetch_all(conn).await
            }
            SeedConnection::MySql(conn) => {
                sqlx::query_scalar::<_, String>(sql).fetch_all(conn).await
            }
            SeedConnection::Sqlite(conn) => {
                sqlx::query_scalar::<_, String>(sql).fetch_all(conn).await
            }
        }
    }

    /// Close the connection, sending the engine's terminate message.
    pub async fn close(self) -> std::result::Result<(), sqlx::Error> {
        match self {
            SeedConnection::Postgres(conn) => conn.close().await,
            SeedConnection::MySql(conn) => conn.close().await,
            SeedConnection::Sqlite(conn) => conn.close().await,
        }
    }
}

/// A failed statement and the database error it raised.
#[derive(Debug)]
pub struct StatementError {
    pub sql: String,
    pub source: sqlx::Error,
}

async fn run_transaction<DB, I, S, F>(
    conn: &mut DB::Connection,
    statements: I,
    mut on_executed: F,
) -> std::result::Result<(), StatementError>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(usize),
{
    let mut tx = conn.begin().await.map_err(|e| StatementError {
        sql: "BEGIN".to_string(),
        source: e,
    })?;

    for (index, statement) in statements.into_iter().enumerate() {
        let sql = statement.as_ref();
        if let Err(e) = sqlx::raw_sql(sql).execute(&mut *tx).await {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("Rollback failed: {}", rollback_err);
            }
            return Err(StatementError {
                sql: sql.to_string(),
                source: e,
            });
        }
        on_executed(index);
    }

    tx.commit().await.map_err(|e| StatementError {
        sql: "COMMIT".to_string(),
        source: e,
    })
}

/// Sanitize a database URL for error messages (hide password).
pub fn sanitize_url(db_url: &str) -> String {
    if let Ok(mut parsed) = url::Url::parse(db_url) {
        if parsed.password().is_some() {
            let _ = parsed.set_password(Some("****"));
        }
        return parsed.to_string();
    }
    // If URL parsing fails, return as-is (e.g., SQLite file paths)
    db_url.to_string()
}
