//! Durable chef records.
//!
//! Names are unique at the schema level; ids are SQLite rowids and so
//! start at 1. Career counters (`wins`, `cookoffs`) only ever move
//! through [`ChefStore::record_result`].

use async_trait::async_trait;
use common::{
    ChefSnapshot, CookoffResult, Cuisine, Error, LeaderboardEntry, LeaderboardSort, NewChef,
    Result,
};
use kitchen::ChefSource;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

/// Chef table access. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct ChefStore {
    pool: SqlitePool,
}

impl ChefStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chefs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                specialty TEXT NOT NULL,
                years_experience INTEGER NOT NULL,
                signature_dishes INTEGER NOT NULL,
                age INTEGER NOT NULL,
                wins INTEGER NOT NULL DEFAULT 0,
                cookoffs INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;
        debug!("Chef schema ready");
        Ok(())
    }

    /// Register a chef and return the stored snapshot.
    pub async fn create(&self, new_chef: &NewChef) -> Result<ChefSnapshot> {
        new_chef.validate()?;
        let inserted = sqlx::query(
            "INSERT INTO chefs (name, specialty, years_experience, signature_dishes, age)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_chef.name)
        .bind(new_chef.specialty.as_str())
        .bind(new_chef.years_experience)
        .bind(new_chef.signature_dishes)
        .bind(new_chef.age)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::InvalidArgument(format!("chef name '{}' is already taken", new_chef.name))
            }
            _ => Error::Database(e.to_string()),
        })?;

        let id = inserted.last_insert_rowid();
        info!("Registered chef '{}' with id {}", new_chef.name, id);
        self.fetch_by_id(id).await
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<ChefSnapshot> {
        let row = sqlx::query("SELECT * FROM chefs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        match row {
            Some(row) => snapshot_from_row(&row),
            None => Err(Error::NotFound(format!("chef id {}", id))),
        }
    }

    pub async fn fetch_by_name(&self, name: &str) -> Result<ChefSnapshot> {
        let row = sqlx::query("SELECT * FROM chefs WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        match row {
            Some(row) => snapshot_from_row(&row),
            None => Err(Error::NotFound(format!("chef '{}'", name))),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM chefs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        if deleted.rows_affected() == 0 {
            return Err(Error::NotFound(format!("chef id {}", id)));
        }
        info!("Deleted chef {}", id);
        Ok(())
    }

    /// Apply one cookoff result to a chef's career counters.
    pub async fn record_result(&self, id: i64, result: CookoffResult) -> Result<()> {
        let sql = match result {
            CookoffResult::Win => {
                "UPDATE chefs SET cookoffs = cookoffs + 1, wins = wins + 1 WHERE id = ?"
            }
            CookoffResult::Loss => "UPDATE chefs SET cookoffs = cookoffs + 1 WHERE id = ?",
        };
        let updated = sqlx::query(sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(format!("chef id {}", id)));
        }
        debug!("Recorded {} for chef {}", result.as_str(), id);
        Ok(())
    }

    /// Career standings over chefs with at least one cookoff.
    ///
    /// Ties break on ascending id so the ordering is stable across calls.
    pub async fn leaderboard(&self, sort: LeaderboardSort) -> Result<Vec<LeaderboardEntry>> {
        let order = match sort {
            LeaderboardSort::Wins => "wins DESC, id ASC",
            LeaderboardSort::WinPct => "win_pct DESC, id ASC",
        };
        let sql = format!(
            "SELECT *, CAST(wins AS REAL) / cookoffs AS win_pct
             FROM chefs WHERE cookoffs > 0 ORDER BY {}",
            order
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.iter()
            .map(|row| {
                Ok(LeaderboardEntry {
                    chef: snapshot_from_row(row)?,
                    win_pct: row.get("win_pct"),
                })
            })
            .collect()
    }
}

fn snapshot_from_row(row: &SqliteRow) -> Result<ChefSnapshot> {
    let specialty: String = row.get("specialty");
    Ok(ChefSnapshot {
        id: row.get("id"),
        name: row.get("name"),
        specialty: specialty.parse::<Cuisine>()?,
        years_experience: row.get("years_experience"),
        signature_dishes: row.get("signature_dishes"),
        age: row.get("age"),
        wins: row.get("wins"),
        cookoffs: row.get("cookoffs"),
    })
}

#[async_trait]
impl ChefSource for ChefStore {
    async fn chef_by_id(&self, id: i64) -> Result<ChefSnapshot> {
        self.fetch_by_id(id).await
    }

    async fn record_result(&self, id: i64, result: CookoffResult) -> Result<()> {
        ChefStore::record_result(self, id, result).await
    }
}
