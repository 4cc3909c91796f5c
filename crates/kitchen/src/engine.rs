//! The kitchen: a bounded roster of chef ids and the cookoff that
//! scores it, picks a winner, and empties it.
//!
//! One tokio mutex guards the roster and its snapshot cache together,
//! so a cookoff observes a consistent roster from the first capacity
//! check to the final clear. The durable store sits behind the
//! [`ChefSource`] trait and the draw behind [`RandomSource`], which
//! keeps the whole engine runnable against in-memory fakes.

use std::time::Duration;

use chrono::Utc;
use common::{AppConfig, ChefSnapshot, CookoffOutcome, CookoffResult, Cuisine, Error, Result};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cache::RosterCache;
use crate::draw::{pick_weighted, RandomSource, ThreadRandom};
use crate::skill;
use crate::ChefSource;

/// Most chefs the roster will hold at once.
pub const KITCHEN_CAPACITY: usize = 20;

/// Fewest chefs a cookoff can run with.
pub const MIN_PARTICIPANTS: usize = 2;

/// Roster and cache, locked as a unit.
struct KitchenState {
    roster: Vec<i64>,
    cache: RosterCache,
}

/// The single shared kitchen.
///
/// `S` is the durable chef store; `R` supplies the uniform draw and
/// defaults to the thread RNG. Tests swap in a fixed draw to make the
/// winner deterministic.
pub struct Kitchen<S: ChefSource, R: RandomSource = ThreadRandom> {
    store: S,
    random: R,
    record_losses: bool,
    state: Mutex<KitchenState>,
}

impl<S: ChefSource> Kitchen<S> {
    pub fn new(store: S, config: &AppConfig) -> Self {
        Self::with_random(store, config, ThreadRandom)
    }
}

impl<S: ChefSource, R: RandomSource> Kitchen<S, R> {
    pub fn with_random(store: S, config: &AppConfig, random: R) -> Self {
        Self {
            store,
            random,
            record_losses: config.record_losses,
            state: Mutex::new(KitchenState {
                roster: Vec::new(),
                cache: RosterCache::new(Duration::from_secs(config.ttl_seconds)),
            }),
        }
    }

    /// Add a chef to the roster.
    ///
    /// Checks run in a fixed order: capacity, then duplicate entry,
    /// then existence in the store. A full kitchen therefore rejects
    /// even ids that would not resolve. The fetched snapshot is not
    /// cached; the roster holds ids only.
    pub async fn enter(&self, chef_id: i64) -> Result<()> {
        let mut state = self.state.lock().await;

        if state.roster.len() >= KITCHEN_CAPACITY {
            warn!("Kitchen is full, turning away chef {}", chef_id);
            return Err(Error::CapacityExceeded {
                capacity: KITCHEN_CAPACITY,
            });
        }
        if state.roster.contains(&chef_id) {
            return Err(Error::DuplicateEntry { id: chef_id });
        }

        let chef = self.store.chef_by_id(chef_id).await?;
        state.roster.push(chef_id);
        info!(
            "{} entered the kitchen ({}/{})",
            chef.name,
            state.roster.len(),
            KITCHEN_CAPACITY
        );
        Ok(())
    }

    /// Snapshots for everyone on the roster, in entry order.
    pub async fn list_current(&self) -> Result<Vec<ChefSnapshot>> {
        let mut state = self.state.lock().await;
        if state.roster.is_empty() {
            warn!("Kitchen roster is empty");
            return Ok(Vec::new());
        }
        let KitchenState { roster, cache } = &mut *state;
        cache.resolve(roster.as_slice(), &self.store).await
    }

    /// Send everyone home without running a cookoff.
    ///
    /// Clearing an empty kitchen is a no-op that still logs, so the
    /// caller sees the same success either way. Cached snapshots are
    /// left to expire on their own.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        if state.roster.is_empty() {
            warn!("Attempted to clear an empty kitchen");
            return;
        }
        let dropped = state.roster.len();
        state.roster.clear();
        info!("Cleared {} chef(s) from the kitchen", dropped);
    }

    /// Drop every cached snapshot so the next read hits the store.
    pub async fn invalidate_cache(&self) {
        let mut state = self.state.lock().await;
        state.cache.invalidate_all();
    }

    /// Run a cookoff in the named cuisine and crown a winner.
    ///
    /// Holds the kitchen lock for the whole run. The roster is cleared
    /// only after the winner's stats have been written, so a storage
    /// failure leaves the kitchen exactly as it was and the cookoff can
    /// be retried.
    pub async fn cookoff(&self, cuisine: Cuisine) -> Result<CookoffOutcome> {
        let mut state = self.state.lock().await;

        // 1. A cookoff needs a field to compete.
        if state.roster.len() < MIN_PARTICIPANTS {
            warn!(
                "Cookoff refused: {} chef(s) in the kitchen, need {}",
                state.roster.len(),
                MIN_PARTICIPANTS
            );
            return Err(Error::InsufficientParticipants {
                count: state.roster.len(),
            });
        }

        // 2. Resolve the roster through the cache, preserving entry order.
        let KitchenState { roster, cache } = &mut *state;
        let snapshots = cache.resolve(roster.as_slice(), &self.store).await?;

        // 3. Score the field for tonight's cuisine.
        let skills: Vec<i64> = snapshots.iter().map(|c| skill::score(c, cuisine)).collect();
        let total: i64 = skills.iter().sum();
        if total <= 0 {
            warn!("Cookoff aborted: total skill {} leaves nothing to weight", total);
            return Err(Error::DegenerateWeights { total });
        }

        // 4. One uniform draw decides the night.
        let draw = self.random.draw();
        let weights: Vec<f64> = skills.iter().map(|&s| s as f64).collect();
        let winner_index =
            pick_weighted(&weights, draw).ok_or(Error::DegenerateWeights { total })?;
        let winner = snapshots[winner_index].clone();
        info!(
            "{} wins the {} cookoff (draw {:.3}, skill {}/{})",
            winner.name, cuisine, draw, skills[winner_index], total
        );

        // 5. Persist results before anyone leaves the kitchen.
        self.record_results(winner.id, &snapshots).await?;

        // 6. Storage accepted the result, so the kitchen empties.
        let participant_ids = std::mem::take(roster);

        Ok(CookoffOutcome {
            winner_id: winner.id,
            winner_name: winner.name,
            participant_ids,
            draw_value: draw,
            decided_at: Utc::now(),
        })
    }

    /// The one place cookoff results reach the store. Wins always;
    /// losses only when the kitchen was configured to record them.
    ///
    /// Writes land one at a time, so a loss write can fail after the win
    /// has already been recorded. The roster survives the error and a
    /// retried cookoff records a fresh win; callers who need the updates
    /// to land together should not enable loss recording.
    async fn record_results(&self, winner_id: i64, participants: &[ChefSnapshot]) -> Result<()> {
        self.store.record_result(winner_id, CookoffResult::Win).await?;
        if self.record_losses {
            for chef in participants.iter().filter(|c| c.id != winner_id) {
                self.store.record_result(chef.id, CookoffResult::Loss).await?;
            }
        }
        Ok(())
    }
}
