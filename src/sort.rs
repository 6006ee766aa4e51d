//! Sort-mode semantics for recipe search.
//!
//! Every sort mode is defined in one place: its total ordering over recipes,
//! the cursor value it mints, and the seek predicate that continues a page.
//! The query builder, the cursor codec, and any query-engine implementation
//! all consume this enum, so the three cannot drift apart.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Recipe;

/// Sort order for recipe search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// exposure_score descending, id descending.
    #[default]
    Relevance,
    /// created_at descending, id descending.
    Latest,
    /// cook_time_minutes ascending with nulls last, id ascending.
    CookTime,
    /// view_count descending, id descending.
    Popularity,
}

/// The sort-position value carried in a cursor. The variant is fixed by the
/// sort mode that minted it.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    /// exposure_score under `relevance`.
    Score(f64),
    /// created_at under `latest`.
    Timestamp(DateTime<Utc>),
    /// cook_time_minutes under `cook_time`; `None` means the cursor row sat
    /// in the null tail.
    Minutes(Option<i32>),
    /// view_count under `popularity`.
    Views(i64),
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Latest => "latest",
            SortMode::CookTime => "cook_time",
            SortMode::Popularity => "popularity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "relevance" => Some(SortMode::Relevance),
            "latest" => Some(SortMode::Latest),
            "cook_time" => Some(SortMode::CookTime),
            "popularity" => Some(SortMode::Popularity),
            _ => None,
        }
    }

    /// Extract the sort position of a row, for minting the next cursor.
    pub fn position(&self, recipe: &Recipe) -> SortKey {
        match self {
            SortMode::Relevance => SortKey::Score(recipe.exposure_score),
            SortMode::Latest => SortKey::Timestamp(recipe.created_at),
            SortMode::CookTime => SortKey::Minutes(recipe.cook_time_minutes),
            SortMode::Popularity => SortKey::Views(recipe.view_count),
        }
    }

    /// Total order over recipes for this mode, tie-break included.
    pub fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        match self {
            SortMode::Relevance => b
                .exposure_score
                .total_cmp(&a.exposure_score)
                .then_with(|| b.id.cmp(&a.id)),
            SortMode::Latest => b
                .created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id)),
            SortMode::CookTime => {
                let minutes = match (a.cook_time_minutes, b.cook_time_minutes) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                minutes.then_with(|| a.id.cmp(&b.id))
            }
            SortMode::Popularity => b
                .view_count
                .cmp(&a.view_count)
                .then_with(|| b.id.cmp(&a.id)),
        }
    }

    /// Strict seek predicate: does `recipe` come after the cursor position
    /// `(key, id)` under this mode's ordering? Mirrors `compare` exactly,
    /// including the null tail for `cook_time` — anything else skips or
    /// duplicates rows across pages.
    pub fn admits(&self, key: &SortKey, id: &str, recipe: &Recipe) -> bool {
        match (self, key) {
            (SortMode::Relevance, SortKey::Score(v)) => {
                recipe.exposure_score < *v
                    || (recipe.exposure_score == *v && recipe.id.as_str() < id)
            }
            (SortMode::Latest, SortKey::Timestamp(v)) => {
                recipe.created_at < *v || (recipe.created_at == *v && recipe.id.as_str() < id)
            }
            (SortMode::CookTime, SortKey::Minutes(Some(v))) => match recipe.cook_time_minutes {
                Some(m) => m > *v || (m == *v && recipe.id.as_str() > id),
                None => true,
            },
            (SortMode::CookTime, SortKey::Minutes(None)) => {
                recipe.cook_time_minutes.is_none() && recipe.id.as_str() > id
            }
            (SortMode::Popularity, SortKey::Views(v)) => {
                recipe.view_count < *v || (recipe.view_count == *v && recipe.id.as_str() < id)
            }
            // A cursor decoded through this mode always carries the matching
            // variant; anything else is a codec bug, so admit nothing.
            _ => false,
        }
    }
}
