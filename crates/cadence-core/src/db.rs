use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use crate::error::CoreError;

// Re-export the pool for use in other parts of the core crate
pub use sqlx::SqlitePool as DbPool;

/// Establishes a connection pool to the SQLite database and runs migrations.
///
/// # Arguments
///
/// * `db_path` - The path to the SQLite database file, or a full `sqlite:` URL
///   (e.g. `sqlite::memory:`), which is passed through untouched.
///
/// # Returns
///
/// A `Result` containing the `SqlitePool` or a `CoreError` if the connection fails
/// or migrations cannot be run.
pub async fn establish_connection(db_path: &str) -> Result<SqlitePool, CoreError> {
    let url = if db_path.starts_with("sqlite:") {
        db_path.to_string()
    } else {
        // Create the database file and directory if they don't exist
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        if !Path::new(db_path).exists() {
            tokio::fs::File::create(db_path).await?;
        }
        format!("sqlite://{}", db_path)
    };

    // In-memory databases are per connection, so keep a single one alive.
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!(database = %db_path, "database ready");
    Ok(pool)
}
