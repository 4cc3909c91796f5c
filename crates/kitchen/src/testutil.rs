//! Shared fixtures for kitchen tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use common::{ChefSnapshot, CookoffResult, Cuisine, Error, Result};

use crate::ChefSource;

pub fn make_chef(
    id: i64,
    name: &str,
    specialty: Cuisine,
    years: i64,
    dishes: i64,
    age: i64,
) -> ChefSnapshot {
    ChefSnapshot {
        id,
        name: name.into(),
        specialty,
        years_experience: years,
        signature_dishes: dishes,
        age,
        wins: 0,
        cookoffs: 0,
    }
}

/// The canonical three-chef roster used across kitchen tests.
///
/// Skills for an Italian cookoff: 140, 135, 88 (total 363).
pub fn test_brigade() -> Vec<ChefSnapshot> {
    vec![
        make_chef(1, "Gordon Ramsay", Cuisine::Italian, 25, 20, 58),
        make_chef(2, "Alvin Leung", Cuisine::Chinese, 30, 10, 64),
        make_chef(3, "Aaron Sanchez", Cuisine::Mexican, 20, 4, 49),
    ]
}

/// In-memory chef source that counts fetches and records stat updates.
pub struct MockStore {
    chefs: Mutex<HashMap<i64, ChefSnapshot>>,
    fetches: AtomicUsize,
    recorded: Mutex<Vec<(i64, CookoffResult)>>,
    record_limit: Option<usize>,
}

impl MockStore {
    pub fn new(chefs: Vec<ChefSnapshot>) -> Self {
        Self {
            chefs: Mutex::new(chefs.into_iter().map(|c| (c.id, c)).collect()),
            fetches: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
            record_limit: None,
        }
    }

    /// Drop a chef from the backing map, as if deleted from storage.
    pub fn remove_chef(&self, id: i64) {
        self.chefs.lock().unwrap().remove(&id);
    }

    /// A store whose record_result always fails, for atomicity tests.
    pub fn failing_on_record(chefs: Vec<ChefSnapshot>) -> Self {
        Self {
            record_limit: Some(0),
            ..Self::new(chefs)
        }
    }

    /// A store that accepts `n` stat updates and fails on the next one.
    pub fn failing_after_records(n: usize, chefs: Vec<ChefSnapshot>) -> Self {
        Self {
            record_limit: Some(n),
            ..Self::new(chefs)
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<(i64, CookoffResult)> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChefSource for MockStore {
    async fn chef_by_id(&self, id: i64) -> Result<ChefSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.chefs
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("chef id {}", id)))
    }

    async fn record_result(&self, id: i64, result: CookoffResult) -> Result<()> {
        let mut recorded = self.recorded.lock().unwrap();
        if let Some(limit) = self.record_limit {
            if recorded.len() >= limit {
                return Err(Error::Database("record_result unavailable".into()));
            }
        }
        if !self.chefs.lock().unwrap().contains_key(&id) {
            return Err(Error::NotFound(format!("chef id {}", id)));
        }
        recorded.push((id, result));
        Ok(())
    }
}
