//! Per-cuisine skill scoring.
//!
//! A chef's skill for a cookoff is a linear blend of career attributes:
//! experience dominates, signature dishes add depth, cooking in your own
//! specialty earns a flat bonus, and the very green or the past-prime
//! take a flat penalty. Pure and deterministic; the weighted draw layers
//! the randomness on top.

use common::{ChefSnapshot, Cuisine};

/// Points per year of experience.
const EXPERIENCE_WEIGHT: i64 = 4;
/// Points per signature dish.
const DISH_WEIGHT: i64 = 2;
/// Flat bonus for competing in the chef's own specialty.
const SPECIALTY_BONUS: i64 = 5;
/// Flat penalty for chefs outside their prime.
const AGE_PENALTY: i64 = 5;

/// Compute a chef's skill for the given cuisine.
///
/// The result may be zero or negative, which is a valid score: a roster
/// full of low scorers is handled at draw time, not here.
pub fn score(chef: &ChefSnapshot, cuisine: Cuisine) -> i64 {
    let specialty_bonus = if cuisine == chef.specialty {
        SPECIALTY_BONUS
    } else {
        0
    };

    // Under 25 with under 4 years counts as green; over 55 as past prime.
    let age_modifier = if (chef.age < 25 && chef.years_experience < 4) || chef.age > 55 {
        -AGE_PENALTY
    } else {
        0
    };

    chef.years_experience * EXPERIENCE_WEIGHT
        + chef.signature_dishes * DISH_WEIGHT
        + specialty_bonus
        + age_modifier
}
