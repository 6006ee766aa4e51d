//! Cached single-recipe detail lookup.
//!
//! Detail entries use the longest TTL in the crate: they are keyed by one id
//! and invalidated explicitly on change, unlike the filter-combinatorial
//! list pages.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::{self, PageCache};
use crate::config::CoreConfig;
use crate::error::SearchError;
use crate::models::{Chef, Ingredient, Recipe, Step, Tag};
use crate::store::RecipeStore;

const CACHE_SCHEMA: &str = "recipe.v1";

/// Full recipe detail, including collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub difficulty: Option<String>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub exposure_score: f64,
    pub view_count: i64,
    pub chef: Option<Chef>,
    pub ingredients: Vec<Ingredient>,
    pub tags: Vec<Tag>,
    pub steps: Vec<Step>,
    pub created_at: DateTime<Utc>,
}

impl RecipeDetail {
    fn from_recipe(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            thumbnail_url: recipe.thumbnail_url,
            difficulty: recipe.difficulty.map(|d| d.as_str().to_string()),
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            exposure_score: recipe.exposure_score,
            view_count: recipe.view_count,
            chef: recipe.chef,
            ingredients: recipe.ingredients,
            tags: recipe.tags,
            steps: recipe.steps,
            created_at: recipe.created_at,
        }
    }
}

/// Cache-aside lookup of one recipe.
pub struct RecipeDetailService {
    store: Arc<dyn RecipeStore>,
    cache: Arc<dyn PageCache>,
    config: CoreConfig,
}

impl RecipeDetailService {
    pub fn new(store: Arc<dyn RecipeStore>, cache: Arc<dyn PageCache>, config: CoreConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Fetch one active recipe, serving from cache when possible.
    pub async fn get(&self, recipe_id: &str) -> Result<RecipeDetail, SearchError> {
        let cache_key = cache::recipe_detail_key(recipe_id);
        if let Some(detail) =
            cache::read_envelope::<RecipeDetail>(self.cache.as_ref(), &cache_key, CACHE_SCHEMA)
                .await
        {
            return Ok(detail);
        }

        tracing::debug!(recipe_id, "recipe detail cache miss");
        let recipe = self
            .store
            .get(recipe_id)
            .await?
            .ok_or_else(|| SearchError::RecipeNotFound(recipe_id.to_string()))?;

        let detail = RecipeDetail::from_recipe(recipe);
        cache::write_envelope(
            self.cache.as_ref(),
            &cache_key,
            CACHE_SCHEMA,
            &detail,
            self.config.detail_ttl,
        )
        .await;

        Ok(detail)
    }
}
