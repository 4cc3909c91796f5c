//! Operator accounts with salted password hashes.
//!
//! Each account carries its own random salt; the stored hash is
//! SHA-256 over password bytes then salt bytes. Changing a password
//! rotates the salt.

use common::{Error, Result};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::{debug, info};

/// User table access. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                salt TEXT NOT NULL,
                password_hash TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;
        debug!("User schema ready");
        Ok(())
    }

    /// Register a new account.
    pub async fn create(&self, username: &str, password: &str) -> Result<()> {
        if username.trim().is_empty() {
            return Err(Error::InvalidArgument("username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(Error::InvalidArgument("password must not be empty".into()));
        }

        let salt = new_salt();
        let hash = hash_password(password, &salt);
        sqlx::query("INSERT INTO users (username, salt, password_hash) VALUES (?, ?, ?)")
            .bind(username)
            .bind(&salt)
            .bind(&hash)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    Error::InvalidArgument(format!("username '{}' is already taken", username))
                }
                _ => Error::Database(e.to_string()),
            })?;
        info!("Created user '{}'", username);
        Ok(())
    }

    /// Check a password attempt. Fails with `NotFound` when no such
    /// user exists; callers decide how much of that to reveal.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool> {
        let row = sqlx::query("SELECT salt, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?
            .ok_or_else(|| Error::NotFound(format!("user '{}'", username)))?;

        let salt: String = row.get("salt");
        let stored: String = row.get("password_hash");
        Ok(hash_password(password, &salt) == stored)
    }

    /// Replace a user's password under a fresh salt.
    pub async fn update_password(&self, username: &str, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(Error::InvalidArgument("password must not be empty".into()));
        }

        let salt = new_salt();
        let hash = hash_password(new_password, &salt);
        let updated =
            sqlx::query("UPDATE users SET salt = ?, password_hash = ? WHERE username = ?")
                .bind(&salt)
                .bind(&hash)
                .bind(username)
                .execute(&self.pool)
                .await
                .map_err(|e| Error::Database(e.to_string()))?;
        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(format!("user '{}'", username)));
        }
        info!("Updated password for '{}'", username);
        Ok(())
    }

    /// Drop every account and recreate the empty table.
    pub async fn reset(&self) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        self.init_schema().await?;
        info!("Reset user accounts");
        Ok(())
    }
}

fn new_salt() -> String {
    format!("{:032x}", rand::rng().random::<u128>())
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}
