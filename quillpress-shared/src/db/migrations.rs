/// Database migration runner
///
/// Runs the SQL migrations embedded from the `migrations/` directory at the
/// crate root. Each migration is a single `{timestamp}_{name}.sql` file
/// applied exactly once, tracked in the `_sqlx_migrations` table.
///
/// # Example
///
/// ```no_run
/// use quillpress_shared::db::migrations::run_migrations;
/// use quillpress_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed or a migration fails to
/// execute; a failed migration is rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations applied");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database if it doesn't exist
///
/// Convenience for development and test environments; production databases
/// are provisioned out of band.
///
/// # Errors
///
/// Returns an error if the server is unreachable or the caller lacks
/// CREATEDB rights.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
