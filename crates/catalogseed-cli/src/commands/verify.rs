use anyhow::{bail, Context, Result};
use comfy_table::Table as ComfyTable;

use catalogseed_core::verify::{verify_products, VerifyReport};
use catalogseed_core::SeedConnection;

use crate::args::{ReportFormat, VerifyArgs};

pub async fn run(args: &VerifyArgs) -> Result<()> {
    let config = super::load_config()?;
    let db_url = super::resolve_db_url(&args.connection, config.as_ref())?;

    let mut conn = SeedConnection::connect(&db_url)
        .await
        .context("Could not open the database connection")?;
    let result = verify_products(&mut conn).await;
    if let Err(e) = conn.close().await {
        tracing::warn!("Failed to close database connection cleanly: {}", e);
    }
    let report = result.context("Failed to read the product table")?;

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_text(&report),
    }

    if !report.is_valid(args.rows) {
        bail!("product table failed verification");
    }
    Ok(())
}

fn print_text(report: &VerifyReport) {
    println!("Rows:             {}", report.total_rows);
    println!("Empty names:      {}", report.empty_names);
    println!("Unknown category: {}", report.unknown_category);

    let mut t = ComfyTable::new();
    t.set_header(vec!["category", "rows"]);
    for (category, count) in &report.per_category {
        t.add_row(vec![category.clone(), count.to_string()]);
    }
    println!("{}", t);

    if !report.unknown_samples.is_empty() {
        println!("Examples of unrecognized names:");
        for name in &report.unknown_samples {
            println!("  {:?}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{ConnectionArgs, SeedArgs};

    fn connection(db: &str) -> ConnectionArgs {
        ConnectionArgs {
            db: Some(db.to_string()),
            ..Default::default()
        }
    }

    async fn seeded_db(dir: &tempfile::TempDir, rows: u64) -> String {
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("seed.db").display());
        let args = SeedArgs {
            connection: connection(&url),
            rows: Some(rows),
            seed: Some(2),
        };
        crate::commands::seed::run(&args).await.unwrap();
        url
    }

    fn verify_args(db: &str, rows: Option<usize>) -> VerifyArgs {
        VerifyArgs {
            connection: connection(db),
            rows,
            format: ReportFormat::Json,
        }
    }

    #[tokio::test]
    async fn test_verify_matching_row_count_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let url = seeded_db(&dir, 30).await;
        run(&verify_args(&url, Some(30))).await.unwrap();
        run(&verify_args(&url, None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_mismatched_row_count_fails() {
        let dir = tempfile::tempdir().unwrap();
        let url = seeded_db(&dir, 30).await;
        let err = run(&verify_args(&url, Some(10_000))).await.unwrap_err();
        assert_eq!(err.to_string(), "product table failed verification");
    }

    #[tokio::test]
    async fn test_verify_missing_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("empty.db").display());
        assert!(run(&verify_args(&url, None)).await.is_err());
    }
}
