//! Data-access layer: pool setup, migrations, and per-table query modules.

pub mod orders;
pub mod plans;
pub mod users;

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open a SQLite pool for the given URL, creating the database file if needed.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Apply pending migrations from `./migrations`.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Current UTC time in the canonical column format.
/// Lexicographic order of these strings matches chronological order.
pub fn now_utc() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod test_util {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    /// In-memory pool pinned to a single connection so every query sees the
    /// same database.
    pub async fn memory_pool() -> anyhow::Result<SqlitePool> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        super::migrate(&pool).await?;
        Ok(pool)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::now_utc;

    #[test]
    fn now_utc_is_sortable_text() {
        let earlier = now_utc();
        let later = now_utc();
        assert!(earlier <= later);
        assert_eq!(earlier.len(), "2025-08-01 00:00:00.000000".len());
    }
}
