//! SQLite persistence: chef records and user accounts.
//!
//! Both stores share one connection pool. [`connect`] creates the
//! database file (and its parent directory) on first run.

pub mod chefs;
pub mod users;

use std::path::Path;

use common::{Error, Result};
use sqlx::sqlite::SqlitePool;
use tracing::info;

pub use chefs::ChefStore;
pub use users::UserStore;

/// Open the SQLite database at `path`, creating it if missing.
pub async fn connect(path: &str) -> Result<SqlitePool> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let url = format!("sqlite://{}?mode=rwc", path);
    let pool = SqlitePool::connect(&url)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;
    info!("Connected to SQLite database at {}", path);
    Ok(pool)
}
