use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use catalogseed_core::config::DEFAULT_ROW_COUNT;
use catalogseed_core::connection::sanitize_url;
use catalogseed_core::words::faker_names;
use catalogseed_core::Seeder;

use crate::args::SeedArgs;

pub async fn run(args: &SeedArgs) -> Result<()> {
    let config = super::load_config()?;
    let db_url = super::resolve_db_url(&args.connection, config.as_ref())?;

    let row_count = args
        .rows
        .map(|r| r as usize)
        .or_else(|| config.as_ref().and_then(|c| c.seed.rows))
        .unwrap_or(DEFAULT_ROW_COUNT);
    let seed = args
        .seed
        .or_else(|| config.as_ref().and_then(|c| c.seed.seed));

    tracing::info!(
        "Seeding {} products into {}",
        row_count,
        sanitize_url(&db_url)
    );

    let seeder = Seeder::connect(&db_url)
        .await
        .context("Could not open the database connection")?
        .with_row_count(row_count);

    let pb = ProgressBar::new(row_count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} products ({eta})")
            .context("Invalid progress bar template")?
            .progress_chars("=> "),
    );
    let progress = |inserted: usize, _total: usize| pb.set_position(inserted as u64);

    let report = seeder
        .run_with(faker_names(seed), Some(&progress), |outcome| {
            pb.suspend(|| println!("{}", outcome.status_line()));
        })
        .await;
    pb.finish_and_clear();

    if report.has_failures() {
        let failed = report.outcomes.iter().filter(|o| !o.is_success()).count();
        bail!("{} of {} seeding steps failed", failed, report.outcomes.len());
    }

    Ok(())
}
