/// Schema migrations
///
/// The `migrations/` directory at the workspace root is embedded at compile
/// time. Each step is an `.up.sql`/`.down.sql` pair named
/// `{timestamp}_{name}`; applying is idempotent.
///
/// ```no_run
/// use taskmanager_shared::db::migrations::{run_migrations, schema_state};
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
///
/// assert!(schema_state(&pool).await?.is_current());
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::Migrator, postgres::PgPool};
use tracing::{error, info};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// How far the database schema has been migrated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaState {
    /// Successfully applied migrations
    pub applied: usize,

    /// Migrations embedded in this build
    pub embedded: usize,

    /// Version of the newest applied migration
    pub latest_version: Option<i64>,
}

impl SchemaState {
    /// True when every embedded migration has been applied
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

/// Applies every pending migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!(embedded = embedded_migrations(), "Applying database migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Migration failed");
        e
    })?;

    info!("Database schema is current");
    Ok(())
}

/// Reads the migration bookkeeping table
///
/// A database that was never migrated reports zero applied migrations.
pub async fn schema_state(pool: &PgPool) -> Result<SchemaState, sqlx::Error> {
    let tracked: Option<String> =
        sqlx::query_scalar("SELECT to_regclass('public._sqlx_migrations')::text")
            .fetch_one(pool)
            .await?;

    let (applied, latest_version): (i64, Option<i64>) = match tracked {
        Some(_) => {
            sqlx::query_as("SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success")
                .fetch_one(pool)
                .await?
        }
        None => (0, None),
    };

    Ok(SchemaState {
        applied: usize::try_from(applied).unwrap_or_default(),
        embedded: embedded_migrations(),
        latest_version,
    })
}

fn embedded_migrations() -> usize {
    MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations_present() {
        // users, statuses/labels, tasks
        assert_eq!(embedded_migrations(), 3);
    }

    #[test]
    fn test_embedded_migrations_are_ordered() {
        let versions: Vec<i64> = MIGRATOR
            .iter()
            .filter(|m| !m.migration_type.is_down_migration())
            .map(|m| m.version)
            .collect();

        assert!(versions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_schema_state_is_current() {
        let state = |applied| SchemaState {
            applied,
            embedded: 3,
            latest_version: None,
        };

        assert!(!state(0).is_current());
        assert!(!state(2).is_current());
        assert!(state(3).is_current());
    }
}
