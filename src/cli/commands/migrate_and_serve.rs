use anyhow::{Context, Result};
use sea_orm::Database;
use tracing::{info, trace};

use super::initdb::run_migrations;
use super::serve::serve;
use crate::config::Settings;

pub async fn migrate_and_serve(settings: &Settings) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");

    let db = Database::connect(&settings.database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", settings.database_url))?;
    run_migrations(&db).await?;
    db.close().await.context("Failed to close migration connection")?;

    serve(settings).await
}
