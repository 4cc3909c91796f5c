//! TTL read-through cache for roster snapshots.
//!
//! Maps chef id to the snapshot last fetched from durable storage, each
//! entry carrying its own expiry deadline. Lookups inside the TTL are
//! served from memory; anything missing or expired is refetched and the
//! entry overwritten. Stat updates elsewhere never invalidate proactively,
//! so a snapshot can lag storage by up to one TTL. That staleness is
//! accepted; `invalidate_all` exists for the cases that cannot accept it.
//!
//! The cache has no lock of its own: it lives next to the roster inside
//! the kitchen's mutex, and the clock is tokio's so expiry is testable
//! with paused time.

use std::collections::HashMap;
use std::time::Duration;

use common::{ChefSnapshot, Result};
use tokio::time::Instant;
use tracing::debug;

use crate::ChefSource;

/// A cached snapshot and the deadline it stays fresh until.
#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: ChefSnapshot,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Read-through snapshot cache bounded by a per-entry TTL.
#[derive(Debug)]
pub struct RosterCache {
    ttl: Duration,
    entries: HashMap<i64, CacheEntry>,
}

impl RosterCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Resolve ids to snapshots, preserving input order.
    ///
    /// Each id is served from a fresh cache entry when one exists,
    /// otherwise fetched from `source` and cached with a new expiry of
    /// now + TTL. A missing id fails the whole call with `NotFound`;
    /// entries already refreshed by that point stay cached.
    pub async fn resolve<S: ChefSource>(
        &mut self,
        ids: &[i64],
        source: &S,
    ) -> Result<Vec<ChefSnapshot>> {
        let now = Instant::now();
        let mut snapshots = Vec::with_capacity(ids.len());

        for &id in ids {
            if let Some(entry) = self.entries.get(&id) {
                if entry.is_fresh(now) {
                    snapshots.push(entry.snapshot.clone());
                    continue;
                }
            }

            let snapshot = source.chef_by_id(id).await?;
            debug!("Refreshed snapshot for chef {} (fresh for {:?})", id, self.ttl);
            self.entries.insert(
                id,
                CacheEntry {
                    snapshot: snapshot.clone(),
                    expires_at: now + self.ttl,
                },
            );
            snapshots.push(snapshot);
        }

        Ok(snapshots)
    }

    /// Drop every cached snapshot immediately. The roster is untouched.
    pub fn invalidate_all(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        debug!("Invalidated {} cached snapshot(s)", dropped);
    }

    #[cfg(test)]
    fn expiry_of(&self, id: i64) -> Option<Instant> {
        self.entries.get(&id).map(|e| e.expires_at)
    }
}
