//! # Seeder
//!
//! Drops, recreates and populates the `product` table over one owned
//! connection. The three steps run in order and each is its own
//! transaction: a failed step is rolled back and reported, and the next step
//! still runs. Nothing is retried.
//!
//! Populate inserts every row inside a single transaction, in multi-row
//! `INSERT` statements of [`INSERT_BATCH_SIZE`] rows generated just before
//! they are sent. Any failure rolls back the whole run's rows.

use std::fmt;

use rand::Rng;

use crate::config::DEFAULT_ROW_COUNT;
use crate::connection::{SeedConnection, StatementError};
use crate::error::{Result, SeedError};
use crate::schema::{build_batched_insert, create_table_sql, drop_table_sql, truncate_sql};
use crate::words::{NameGenerator, WordSource};

/// Rows per multi-row INSERT statement.
pub const INSERT_BATCH_SIZE: usize = 100;

/// Receives (rows_inserted_so_far, total_rows) after each batch.
pub type ProgressCallback<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    DropTable,
    CreateTable,
    Populate,
}

impl Step {
    fn failure_prefix(&self) -> &'static str {
        match self {
            Step::DropTable => "Error dropping product table",
            Step::CreateTable => "Error creating product table",
            Step::Populate => "Error inserting product names",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::DropTable => write!(f, "Drop table"),
            Step::CreateTable => write!(f, "Create table"),
            Step::Populate => write!(f, "Populate"),
        }
    }
}

#[derive(Debug)]
pub enum StepStatus {
    Succeeded { detail: String },
    Failed(SeedError),
}

/// Result of one seeding step.
#[derive(Debug)]
pub struct StepOutcome {
    pub step: Step,
    pub status: StepStatus,
}

impl StepOutcome {
    fn succeeded(step: Step, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::info!("{} committed: {}", step, detail);
        Self {
            step,
            status: StepStatus::Succeeded { detail },
        }
    }

    fn failed(step: Step, err: StatementError) -> Self {
        tracing::warn!("{} rolled back after error: {}", step, err.source);
        Self {
            step,
            status: StepStatus::Failed(SeedError::Statement {
                step,
                sql_preview: truncate_sql(&err.sql, 200),
                source: err.source,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, StepStatus::Succeeded { .. })
    }

    pub fn error(&self) -> Option<&SeedError> {
        match &self.status {
            StepStatus::Failed(err) => Some(err),
            StepStatus::Succeeded { .. } => None,
        }
    }

    /// One human-readable console line for this step.
    pub fn status_line(&self) -> String {
        match &self.status {
            StepStatus::Succeeded { detail } => detail.clone(),
            StepStatus::Failed(SeedError::Statement { source, .. }) => {
                format!("{}: {}", self.step.failure_prefix(), source)
            }
            StepStatus::Failed(err) => format!("{}: {}", self.step.failure_prefix(), err),
        }
    }
}

/// Outcomes of a full run, in step order.
#[derive(Debug)]
pub struct SeedReport {
    pub outcomes: Vec<StepOutcome>,
    /// Rows committed by the populate step (0 if it failed).
    pub rows_inserted: usize,
}

impl SeedReport {
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_success())
    }

    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.step == step)
    }
}

/// Owns the run's single connection and executes the seeding steps.
pub struct Seeder {
    conn: SeedConnection,
    row_count: usize,
}

impl Seeder {
    pub fn new(conn: SeedConnection) -> Self {
        Self {
            conn,
            row_count: DEFAULT_ROW_COUNT,
        }
    }

    /// Open a connection to `db_url` and wrap it in a seeder.
    pub async fn connect(db_url: &str) -> Result<Self> {
        Ok(Self::new(SeedConnection::connect(db_url).await?))
    }

    /// Sets the number of products the populate step inserts.
    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn connection(&mut self) -> &mut SeedConnection {
        &mut self.conn
    }

    /// Step 1: `DROP TABLE IF EXISTS product`.
    pub async fn drop_table(&mut self) -> StepOutcome {
        tracing::info!("Dropping product table");
        let sql = drop_table_sql(self.conn.database_type());
        match self.conn.execute_in_transaction([sql]).await {
            Ok(()) => StepOutcome::succeeded(Step::DropTable, "Product table dropped successfully."),
            Err(e) => StepOutcome::failed(Step::DropTable, e),
        }
    }

    /// Step 2: create the product table.
    pub async fn create_table(&mut self) -> StepOutcome {
        tracing::info!("Creating product table");
        let sql = create_table_sql(self.conn.database_type());
        match self.conn.execute_in_transaction([sql]).await {
            Ok(()) => StepOutcome::succeeded(Step::CreateTable, "Product table created successfully."),
            Err(e) => StepOutcome::failed(Step::CreateTable, e),
        }
    }

    /// Step 3: insert `row_count` generated products in one transaction.
    pub async fn populate<W: WordSource, R: Rng>(
        &mut self,
        names: &mut NameGenerator<W, R>,
        progress: Option<ProgressCallback<'_>>,
    ) -> StepOutcome {
        let total = self.row_count;
        let db_type = self.conn.database_type();
        tracing::info!("Inserting {} product names", total);

        let batches = total.div_ceil(INSERT_BATCH_SIZE);
        let statements = (0..batches).map(|i| {
            let size = INSERT_BATCH_SIZE.min(total - i * INSERT_BATCH_SIZE);
            build_batched_insert(&names.take_names(size), db_type)
        });

        let on_executed = |i: usize| {
            let inserted = ((i + 1) * INSERT_BATCH_SIZE).min(total);
            tracing::debug!("Inserted {}/{} products (uncommitted)", inserted, total);
            if let Some(cb) = progress {
                cb(inserted, total);
            }
        };

        match self
            .conn
            .execute_in_transaction_with(statements, on_executed)
            .await
        {
            Ok(()) => StepOutcome::succeeded(
                Step::Populate,
                format!("{} product names inserted successfully.", total),
            ),
            Err(e) => StepOutcome::failed(Step::Populate, e),
        }
    }

    /// Run all three steps, then close the connection.
    ///
    /// Every step runs even if an earlier one failed. The connection is
    /// consumed and closed exactly once, whatever the outcomes.
    pub async fn run<W: WordSource, R: Rng>(
        self,
        names: NameGenerator<W, R>,
        progress: Option<ProgressCallback<'_>>,
    ) -> SeedReport {
        self.run_with(names, progress, |_| {}).await
    }

    /// Like [`run`](Self::run), handing each outcome to `on_step` as soon as
    /// its step finishes.
    pub async fn run_with<W, R, F>(
        mut self,
        mut names: NameGenerator<W, R>,
        progress: Option<ProgressCallback<'_>>,
        mut on_step: F,
    ) -> SeedReport
    where
        W: WordSource,
        R: Rng,
        F: FnMut(&StepOutcome),
    {
        let mut outcomes = Vec::with_capacity(3);

        let dropped = self.drop_table().await;
        on_step(&dropped);
        outcomes.push(dropped);

        let created = self.create_table().await;
        on_step(&created);
        outcomes.push(created);

        let populated = self.populate(&mut names, progress).await;
        on_step(&populated);
        let rows_inserted = if populated.is_success() {
            self.row_count
        } else {
            0
        };
        outcomes.push(populated);

        self.close().await;

        SeedReport {
            outcomes,
            rows_inserted,
        }
    }

    /// Release the connection. Close errors are logged, not returned.
    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            tracing::warn!("Failed to close database connection cleanly: {}", e);
        }
    }
}
