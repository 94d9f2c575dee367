//! Inkpress - blog data backend

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkpress::{
    admin,
    config::Config,
    db::{self, schema},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpress=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Inkpress data backend...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Apply schema
    schema::init_schema(&pool).await?;
    pool.ping().await?;
    tracing::info!("Schema ready");

    // Log the admin registry so operators can see what is exposed
    for entry in admin::registry() {
        tracing::info!(
            model = entry.model,
            label = entry.verbose_name_plural,
            columns = %entry.list_display.join(", "),
            slug_from = entry.slug_source.unwrap_or("-"),
            "registered model"
        );
    }

    let stats = admin::dashboard_stats(&pool).await?;
    tracing::info!(
        users = stats.total_users,
        categories = stats.total_categories,
        tags = stats.total_tags,
        posts = stats.total_posts,
        published = stats.published_posts,
        comments = stats.total_comments,
        "entity counts"
    );

    pool.close().await;
    Ok(())
}
