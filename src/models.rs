//! Read model for the search and recommendation subsystem.
//!
//! Recipes are written by an external ingestion process; everything here is
//! read-only. Only active recipes are ever visible to this crate.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque recipe identifier. Comparisons are lexicographic, which is all the
/// cursor tie-break needs.
pub type RecipeId = String;

/// Recipe difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Ordinal position, used for difficulty-distance scoring.
    pub fn rank(&self) -> i32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}

/// A single ingredient line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: Option<String>,
    pub unit: Option<String>,
}

/// A tag attached to a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
}

/// A cooking step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub position: i32,
    pub instruction: String,
}

/// Chef summary as embedded in the read model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chef {
    pub id: Uuid,
    pub name: String,
    pub profile_image_url: Option<String>,
}

/// A recipe row with its associated collections, as returned by the query
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    /// Relevance proxy maintained by the ingestion pipeline.
    pub exposure_score: f64,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub chef: Option<Chef>,
    pub is_active: bool,
    pub ingredients: Vec<Ingredient>,
    pub tags: Vec<Tag>,
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn chef_id(&self) -> Option<Uuid> {
        self.chef.as_ref().map(|c| c.id)
    }

    pub fn tag_ids(&self) -> HashSet<&str> {
        self.tags.iter().map(|t| t.id.as_str()).collect()
    }

    /// Ingredient names normalized for overlap comparison (trimmed,
    /// lowercased).
    pub fn ingredient_names(&self) -> HashSet<String> {
        self.ingredients
            .iter()
            .map(|i| i.name.trim().to_lowercase())
            .collect()
    }
}
