//! Example: Generate a small organization into an in-memory store.
//!
//! This needs no database and shows what one month of activity looks like:
//! - 10 users in 2 teams
//! - 5 projects with their board sections
//! - Tasks, subtasks, comments, attachments, tags, and custom fields
//!
//! Run with:
//! ```
//! cargo run --example seed_small
//! ```

use pm_seed::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = MemoryStore::new();
    let dataset = DatasetBuilder::small_test()
        .with_metrics(true)
        .build(&store, &TemplateText::new())
        .await?;

    tracing::info!("Small dataset ready!");
    for (table, count) in dataset.row_counts() {
        tracing::info!("  {}: {}", table, count);
    }

    for task in dataset.tasks.iter().take(5) {
        tracing::info!(
            "  [{}] {} (due {:?}, completed: {})",
            task.priority.as_str(),
            task.name,
            task.due_date(),
            task.completed
        );
    }

    if let Some(metrics) = &dataset.metrics {
        tracing::info!(
            "Generated in {} ms, stored in {} ms",
            metrics.generation_time_ms,
            metrics.seeding_time_ms
        );
    }

    Ok(())
}
