//! Composite similarity scoring between recipes.
//!
//! A candidate is scored against a base recipe on three axes: tag overlap
//! (40%), ingredient-name overlap (40%), and cooking-attribute proximity
//! (20%). Overlap is Jaccard — intersection over union — so a shared tag or
//! ingredient never lowers the score and an unshared one never raises it.
//! Scores land in [0.0, 1.0], rounded to four decimals so they survive the
//! cursor wire format unchanged.

use std::collections::HashSet;

use crate::models::{Difficulty, Recipe};

pub const WEIGHT_TAGS: f64 = 0.4;
pub const WEIGHT_INGREDIENTS: f64 = 0.4;
pub const WEIGHT_COOKING: f64 = 0.2;

/// Cook-time differences at or beyond this many minutes score zero proximity.
const COOK_TIME_SPREAD_MINUTES: f64 = 30.0;

/// The base recipe's comparison profile, extracted once per request instead
/// of per candidate.
#[derive(Debug, Clone)]
pub struct BaseProfile {
    pub tag_ids: HashSet<String>,
    pub ingredient_names: HashSet<String>,
    pub difficulty: Option<Difficulty>,
    pub cook_time_minutes: Option<i32>,
}

impl BaseProfile {
    pub fn of(recipe: &Recipe) -> Self {
        Self {
            tag_ids: recipe.tag_ids().into_iter().map(str::to_string).collect(),
            ingredient_names: recipe.ingredient_names(),
            difficulty: recipe.difficulty,
            cook_time_minutes: recipe.cook_time_minutes,
        }
    }
}

/// Composite similarity of `candidate` to the base profile.
pub fn score(base: &BaseProfile, candidate: &Recipe) -> f64 {
    let candidate_tags: HashSet<String> =
        candidate.tag_ids().into_iter().map(str::to_string).collect();
    let tag_sim = jaccard(&base.tag_ids, &candidate_tags);
    let ingredient_sim = jaccard(&base.ingredient_names, &candidate.ingredient_names());
    let cooking_sim = cooking_proximity(
        base.difficulty,
        base.cook_time_minutes,
        candidate.difficulty,
        candidate.cook_time_minutes,
    );

    let combined =
        tag_sim * WEIGHT_TAGS + ingredient_sim * WEIGHT_INGREDIENTS + cooking_sim * WEIGHT_COOKING;
    round4(combined)
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Cooking-attribute proximity: half cook-time closeness, half difficulty
/// distance. Missing-on-both-sides attributes score a neutral 0.5; missing on
/// one side scores 0.
fn cooking_proximity(
    base_difficulty: Option<Difficulty>,
    base_minutes: Option<i32>,
    candidate_difficulty: Option<Difficulty>,
    candidate_minutes: Option<i32>,
) -> f64 {
    let time = match (base_minutes, candidate_minutes) {
        (Some(a), Some(b)) => {
            let diff = (a - b).abs() as f64;
            (1.0 - diff / COOK_TIME_SPREAD_MINUTES).max(0.0)
        }
        (None, None) => 0.5,
        _ => 0.0,
    };

    let difficulty = match (base_difficulty, candidate_difficulty) {
        (Some(a), Some(b)) => {
            let distance = (a.rank() - b.rank()).abs() as f64;
            1.0 - distance * 0.5
        }
        (None, None) => 0.5,
        _ => 0.0,
    };

    time * 0.5 + difficulty * 0.5
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
