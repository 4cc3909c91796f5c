//! Domain types shared across the cookoff backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── Cuisines ──────────────────────────────────────────────────────────

/// The closed set of cuisines a cookoff can be themed around.
///
/// Requests carry cuisines as strings; parsing into this enum is the only
/// validation point, so everything past the boundary works with a value
/// that is known to be legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cuisine {
    Italian,
    Chinese,
    Greek,
    Japanese,
    Korean,
    Indian,
    Mexican,
    Cajun,
}

impl Cuisine {
    pub const ALL: [Cuisine; 8] = [
        Cuisine::Italian,
        Cuisine::Chinese,
        Cuisine::Greek,
        Cuisine::Japanese,
        Cuisine::Korean,
        Cuisine::Indian,
        Cuisine::Mexican,
        Cuisine::Cajun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::Italian => "Italian",
            Cuisine::Chinese => "Chinese",
            Cuisine::Greek => "Greek",
            Cuisine::Japanese => "Japanese",
            Cuisine::Korean => "Korean",
            Cuisine::Indian => "Indian",
            Cuisine::Mexican => "Mexican",
            Cuisine::Cajun => "Cajun",
        }
    }
}

impl FromStr for Cuisine {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Error> {
        Cuisine::ALL
            .into_iter()
            .find(|c| c.as_str() == raw)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown cuisine '{}'", raw)))
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Chef records ──────────────────────────────────────────────────────

/// A chef as read from durable storage at one point in time.
///
/// Win/cookoff counts are only as fresh as the read that produced the
/// snapshot; the roster cache may serve one for up to its TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChefSnapshot {
    pub id: i64,
    pub name: String,
    pub specialty: Cuisine,
    pub years_experience: i64,
    pub signature_dishes: i64,
    pub age: i64,
    pub wins: i64,
    pub cookoffs: i64,
}

/// Attributes supplied when registering a chef.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChef {
    pub name: String,
    pub specialty: Cuisine,
    pub years_experience: i64,
    pub signature_dishes: i64,
    pub age: i64,
}

impl NewChef {
    /// Check the registration attributes against the domain bounds.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidArgument("chef name must not be empty".into()));
        }
        if !(MIN_CHEF_AGE..=MAX_CHEF_AGE).contains(&self.age) {
            return Err(Error::InvalidArgument(format!(
                "age {} is out of range ({}-{})",
                self.age, MIN_CHEF_AGE, MAX_CHEF_AGE
            )));
        }
        if !(0..=MAX_YEARS_EXPERIENCE).contains(&self.years_experience) {
            return Err(Error::InvalidArgument(format!(
                "years_experience {} is out of range (0-{})",
                self.years_experience, MAX_YEARS_EXPERIENCE
            )));
        }
        if !(0..=MAX_SIGNATURE_DISHES).contains(&self.signature_dishes) {
            return Err(Error::InvalidArgument(format!(
                "signature_dishes {} is out of range (0-{})",
                self.signature_dishes, MAX_SIGNATURE_DISHES
            )));
        }
        Ok(())
    }
}

/// Youngest age a chef may register at.
pub const MIN_CHEF_AGE: i64 = 18;
/// Oldest age a chef may register at.
pub const MAX_CHEF_AGE: i64 = 65;
/// Most years of experience a registration may claim; the skill
/// arithmetic relies on counters staying this small.
pub const MAX_YEARS_EXPERIENCE: i64 = 60;
/// Most signature dishes a registration may claim.
pub const MAX_SIGNATURE_DISHES: i64 = 500;

// ── Cookoff results ───────────────────────────────────────────────────

/// Outcome recorded against a chef's career stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookoffResult {
    Win,
    Loss,
}

impl CookoffResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookoffResult::Win => "win",
            CookoffResult::Loss => "loss",
        }
    }
}

/// The resolution of one cookoff, returned to the caller.
///
/// Ephemeral: the winner's stat update is the only part that persists.
/// `draw_value` is the raw uniform draw, kept so a result can be replayed
/// against the participant skills when debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookoffOutcome {
    pub winner_id: i64,
    pub winner_name: String,
    /// Participants in roster (entry) order.
    pub participant_ids: Vec<i64>,
    pub draw_value: f64,
    pub decided_at: DateTime<Utc>,
}

// ── Leaderboard ───────────────────────────────────────────────────────

/// Sort key for the leaderboard query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardSort {
    Wins,
    WinPct,
}

impl FromStr for LeaderboardSort {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Error> {
        match raw {
            "wins" => Ok(LeaderboardSort::Wins),
            "win_pct" => Ok(LeaderboardSort::WinPct),
            other => Err(Error::InvalidArgument(format!(
                "sort must be 'wins' or 'win_pct', got '{}'",
                other
            ))),
        }
    }
}

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub chef: ChefSnapshot,
    /// Wins over cookoffs; only chefs with at least one cookoff are ranked.
    pub win_pct: f64,
}
