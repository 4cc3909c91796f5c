//! Kitchen engine crate.
//!
//! Skill scoring, weighted winner selection, the TTL roster cache, and the
//! kitchen orchestrator that ties them together.

pub mod cache;
pub mod draw;
pub mod engine;
pub mod skill;

#[cfg(test)]
mod testutil;

use async_trait::async_trait;
use common::{ChefSnapshot, CookoffResult, Result};

/// The narrow view of durable chef storage the kitchen consumes.
///
/// Both methods fail with `Error::NotFound` when the id has no record;
/// a roster can outlive a chef's row, so the kitchen must not assume a
/// previously entered id still resolves.
#[async_trait]
pub trait ChefSource: Send + Sync {
    /// Fetch the current snapshot for a chef id.
    async fn chef_by_id(&self, id: i64) -> Result<ChefSnapshot>;

    /// Record a cookoff result against a chef's career stats.
    async fn record_result(&self, id: i64, result: CookoffResult) -> Result<()>;
}

#[async_trait]
impl<S: ChefSource + ?Sized> ChefSource for std::sync::Arc<S> {
    async fn chef_by_id(&self, id: i64) -> Result<ChefSnapshot> {
        (**self).chef_by_id(id).await
    }

    async fn record_result(&self, id: i64, result: CookoffResult) -> Result<()> {
        (**self).record_result(id, result).await
    }
}

pub use cache::RosterCache;
pub use draw::{pick_weighted, FixedDraw, RandomSource, ThreadRandom};
pub use engine::{Kitchen, KITCHEN_CAPACITY, MIN_PARTICIPANTS};
