use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, info, trace};

/// Connect to `database_url` and apply every pending migration.
pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    let db: DatabaseConnection = Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;
    info!("Successfully connected to database");

    run_migrations(&db).await?;

    info!("Database initialization completed successfully!");
    Ok(())
}

pub(crate) async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    let pending = Migrator::get_pending_migrations(db)
        .await
        .context("Failed to read migration status")?;
    info!("Running {} pending database migrations", pending.len());

    Migrator::up(db, None)
        .await
        .context("Failed to run database migrations")?;

    debug!("All pending migrations have been applied");
    Ok(())
}
