//! Prepare a forum data directory.
//!
//! Ensures the protected default category and the founder account exist,
//! then logs every category with its topic and reply counts. Safe to run
//! repeatedly.

use forum_db::config::StoreConfig;
use forum_db::repositories::{CategoryRepo, UserRepo};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum_seed=info,forum_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = StoreConfig::from_env()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        quota_bytes = ?config.quota_bytes,
        "Loaded store configuration"
    );

    // --- Store ---
    let store = forum_db::open_store(&config)?;
    tracing::info!("Store opened");

    // --- Defaults ---
    let outcome = CategoryRepo::initialize(&store)?;
    let founder_created = UserRepo::initialize(&store)?;
    tracing::info!(?outcome, founder_created, "Defaults ensured");

    // --- Summary ---
    let categories = CategoryRepo::list_with_stats(&store)?;
    for entry in &categories {
        tracing::info!(
            id = entry.category.id,
            key = %entry.category.key,
            name = %entry.category.name,
            protected = entry.category.protected,
            topics = entry.stats.topic_count,
            replies = entry.stats.reply_count,
            "Category"
        );
    }
    let users = UserRepo::list(&store)?;
    tracing::info!(
        categories = categories.len(),
        users = users.len(),
        "Seed complete"
    );

    Ok(())
}
