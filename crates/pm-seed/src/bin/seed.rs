//! Default seed script - generates a full organization and writes it to PostgreSQL
//!
//! Run with:
//! ```
//! cargo run -p pm-seed --bin seed -- [--clear]
//! ```
//!
//! Settings come from environment variables; see `pm_seed::config`.

use std::time::Instant;

use anyhow::Context;
use pm_seed::builders::DatasetBuilder;
use pm_seed::config::RunConfig;
use pm_seed::db::Seeder;
use pm_seed::text::build_text_generator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let started = Instant::now();
    let mut config = RunConfig::from_env().context("invalid configuration")?;
    if std::env::args().skip(1).any(|arg| arg == "--clear") {
        config.clear_database = true;
    }

    tracing::info!(
        "Seeding {} users in {} teams from {} to {} (seed {})",
        config.org_size,
        config.num_teams,
        config.start_date,
        config.end_date,
        config.seed
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("could not connect to database")?;

    tracing::info!("Connected to database");

    let seeder = Seeder::new(pool).with_batch_size(config.batch_size);
    seeder.migrate().await?;
    if config.clear_database {
        seeder.clear_all().await?;
    }

    // The network text client blocks, so generation runs off the async workers.
    let backend = config.text.clone();
    let builder = DatasetBuilder::from_config(config).with_metrics(true);
    let mut dataset = tokio::task::spawn_blocking(move || {
        let text = build_text_generator(&backend);
        builder.build_data(text.as_ref())
    })
    .await??;

    let seed_start = Instant::now();
    dataset.persist(&seeder).await?;
    if let Some(metrics) = dataset.metrics.as_mut() {
        metrics.seeding_time_ms = seed_start.elapsed().as_millis() as u64;
        tracing::info!(
            "Generated in {} ms, seeded in {} ms",
            metrics.generation_time_ms,
            metrics.seeding_time_ms
        );
    }

    // Summary output
    tracing::info!("Seed completed in {:.1}s!", started.elapsed().as_secs_f64());
    let counts = dataset.row_counts();
    for (table, count) in &counts {
        tracing::info!("  {}: {}", table, count);
    }
    tracing::info!("  Total: {}", counts.iter().map(|(_, n)| n).sum::<usize>());

    Ok(())
}
