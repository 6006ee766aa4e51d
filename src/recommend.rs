//! Recommendation orchestration: similar recipes, same-chef recipes,
//! related-by-tags, and popular-in-category.
//!
//! All four endpoints share one shape: fetch a bounded candidate superset
//! from the store, rank it in process (similarity is not expressible as an
//! ORDER BY), then paginate the ranked list with the over-fetch sentinel.
//! Each endpoint mints its own cursor scope; replaying a cursor across
//! endpoints is rejected before any store call.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cache::{self, PageCache};
use crate::config::CoreConfig;
use crate::cursor::{RankCursor, RankScope};
use crate::error::SearchError;
use crate::models::{Chef, Recipe, RecipeId, Tag};
use crate::page::{self, Page};
use crate::similarity::{self, BaseProfile};
use crate::store::RecipeStore;

pub const DEFAULT_RECOMMEND_LIMIT: usize = 10;
pub const MAX_RECOMMEND_LIMIT: usize = 50;

/// A recipe ranked by content similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarItem {
    pub id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub difficulty: Option<String>,
    pub cook_time_minutes: Option<i32>,
    pub chef: Option<Chef>,
    pub similarity_score: f64,
    pub tags: Vec<Tag>,
}

/// Another recipe by the same chef, ranked by views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SameChefItem {
    pub id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub difficulty: Option<String>,
    pub cook_time_minutes: Option<i32>,
    pub chef: Option<Chef>,
    pub view_count: i64,
    pub tags: Vec<Tag>,
}

/// A recipe ranked by how many tags it shares with the base recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedByTagsItem {
    pub id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub difficulty: Option<String>,
    pub cook_time_minutes: Option<i32>,
    pub chef: Option<Chef>,
    pub shared_tag_count: usize,
    pub shared_tags: Vec<Tag>,
    pub tags: Vec<Tag>,
}

/// A popular recipe from the base recipe's category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPopularItem {
    pub id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub difficulty: Option<String>,
    pub cook_time_minutes: Option<i32>,
    pub view_count: i64,
    pub category: String,
    pub tags: Vec<Tag>,
}

/// One candidate in a ranked list, before pagination.
struct RankedRow<T> {
    primary: f64,
    secondary: f64,
    id: RecipeId,
    payload: T,
}

/// Recommendation orchestrator over the query engine and page cache.
pub struct SimilarRecipeService {
    store: Arc<dyn RecipeStore>,
    cache: Arc<dyn PageCache>,
    config: CoreConfig,
}

impl SimilarRecipeService {
    pub fn new(store: Arc<dyn RecipeStore>, cache: Arc<dyn PageCache>, config: CoreConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Recipes similar to `recipe_id` by tag/ingredient/cooking-attribute
    /// composite score, highest first.
    pub async fn similar(
        &self,
        recipe_id: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<SimilarItem>, SearchError> {
        let started = Instant::now();
        let limit = effective_limit(limit);
        let seek = decode_seek(cursor, RankScope::Similar)?;

        let cache_key = cache::recommend_key(recipe_id, RankScope::Similar, cursor, limit);
        if let Some(page) =
            cache::read_envelope::<Page<SimilarItem>>(self.cache.as_ref(), &cache_key, "similar.v1")
                .await
        {
            return Ok(page);
        }

        let base = self.base_recipe(recipe_id).await?;
        let profile = BaseProfile::of(&base);

        let candidates = if profile.tag_ids.is_empty() {
            // Nothing to pivot on: fall back to a smaller sample and let the
            // ingredient/cooking axes do the ranking.
            self.store
                .active_sample(recipe_id, self.config.fallback_pool)
                .await?
        } else {
            let tag_ids: Vec<String> = profile.tag_ids.iter().cloned().collect();
            self.store
                .sharing_any_tag(&tag_ids, recipe_id, self.config.candidate_pool)
                .await?
        };

        let rows: Vec<RankedRow<SimilarItem>> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let score = similarity::score(&profile, &candidate);
                if score <= 0.0 {
                    return None;
                }
                Some(RankedRow {
                    primary: score,
                    secondary: candidate.exposure_score,
                    id: candidate.id.clone(),
                    payload: SimilarItem {
                        id: candidate.id,
                        title: candidate.title,
                        thumbnail_url: candidate.thumbnail_url,
                        difficulty: candidate.difficulty.map(|d| d.as_str().to_string()),
                        cook_time_minutes: candidate.cook_time_minutes,
                        chef: candidate.chef,
                        similarity_score: score,
                        tags: candidate.tags,
                    },
                })
            })
            .collect();

        let page = rank_and_page(RankScope::Similar, rows, seek.as_ref(), limit);

        cache::write_envelope(
            self.cache.as_ref(),
            &cache_key,
            "similar.v1",
            &page,
            self.config.recommend_ttl,
        )
        .await;

        tracing::info!(
            recipe_id,
            result_count = page.items.len(),
            has_more = page.has_more,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "similar recipes retrieved"
        );
        Ok(page)
    }

    /// Other recipes by the same chef, most viewed first. Empty page when the
    /// base recipe has no chef.
    pub async fn same_chef(
        &self,
        recipe_id: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<SameChefItem>, SearchError> {
        let started = Instant::now();
        let limit = effective_limit(limit);
        let seek = decode_seek(cursor, RankScope::SameChef)?;

        let cache_key = cache::recommend_key(recipe_id, RankScope::SameChef, cursor, limit);
        if let Some(page) = cache::read_envelope::<Page<SameChefItem>>(
            self.cache.as_ref(),
            &cache_key,
            "same_chef.v1",
        )
        .await
        {
            return Ok(page);
        }

        let base = self.base_recipe(recipe_id).await?;
        let Some(chef_id) = base.chef_id() else {
            return Ok(Page::empty());
        };

        let candidates = self
            .store
            .by_chef(chef_id, recipe_id, self.config.candidate_pool)
            .await?;

        let rows: Vec<RankedRow<SameChefItem>> = candidates
            .into_iter()
            .map(|candidate| RankedRow {
                primary: candidate.view_count as f64,
                secondary: candidate.exposure_score,
                id: candidate.id.clone(),
                payload: SameChefItem {
                    id: candidate.id,
                    title: candidate.title,
                    thumbnail_url: candidate.thumbnail_url,
                    difficulty: candidate.difficulty.map(|d| d.as_str().to_string()),
                    cook_time_minutes: candidate.cook_time_minutes,
                    chef: candidate.chef,
                    view_count: candidate.view_count,
                    tags: candidate.tags,
                },
            })
            .collect();

        let page = rank_and_page(RankScope::SameChef, rows, seek.as_ref(), limit);

        cache::write_envelope(
            self.cache.as_ref(),
            &cache_key,
            "same_chef.v1",
            &page,
            self.config.recommend_ttl,
        )
        .await;

        tracing::info!(
            recipe_id,
            chef_id = %chef_id,
            result_count = page.items.len(),
            has_more = page.has_more,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "same chef recipes retrieved"
        );
        Ok(page)
    }

    /// Recipes sharing tags with the base recipe, most shared tags first.
    /// Empty page when the base recipe has no tags.
    pub async fn related_by_tags(
        &self,
        recipe_id: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<RelatedByTagsItem>, SearchError> {
        let started = Instant::now();
        let limit = effective_limit(limit);
        let seek = decode_seek(cursor, RankScope::RelatedTags)?;

        let cache_key = cache::recommend_key(recipe_id, RankScope::RelatedTags, cursor, limit);
        if let Some(page) = cache::read_envelope::<Page<RelatedByTagsItem>>(
            self.cache.as_ref(),
            &cache_key,
            "related_tags.v1",
        )
        .await
        {
            return Ok(page);
        }

        let base = self.base_recipe(recipe_id).await?;
        if base.tags.is_empty() {
            return Ok(Page::empty());
        }
        let base_tag_ids: Vec<String> = base.tags.iter().map(|t| t.id.clone()).collect();

        let candidates = self
            .store
            .sharing_any_tag(&base_tag_ids, recipe_id, self.config.candidate_pool)
            .await?;

        let rows: Vec<RankedRow<RelatedByTagsItem>> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let shared_tags: Vec<Tag> = base
                    .tags
                    .iter()
                    .filter(|bt| candidate.tags.iter().any(|ct| ct.id == bt.id))
                    .cloned()
                    .collect();
                if shared_tags.is_empty() {
                    return None;
                }
                Some(RankedRow {
                    primary: shared_tags.len() as f64,
                    secondary: candidate.view_count as f64,
                    id: candidate.id.clone(),
                    payload: RelatedByTagsItem {
                        id: candidate.id,
                        title: candidate.title,
                        thumbnail_url: candidate.thumbnail_url,
                        difficulty: candidate.difficulty.map(|d| d.as_str().to_string()),
                        cook_time_minutes: candidate.cook_time_minutes,
                        chef: candidate.chef,
                        shared_tag_count: shared_tags.len(),
                        shared_tags,
                        tags: candidate.tags,
                    },
                })
            })
            .collect();

        let page = rank_and_page(RankScope::RelatedTags, rows, seek.as_ref(), limit);

        cache::write_envelope(
            self.cache.as_ref(),
            &cache_key,
            "related_tags.v1",
            &page,
            self.config.recommend_ttl,
        )
        .await;

        tracing::info!(
            recipe_id,
            base_tag_count = base.tags.len(),
            result_count = page.items.len(),
            has_more = page.has_more,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "related-by-tags recipes retrieved"
        );
        Ok(page)
    }

    /// Popular recipes from the base recipe's category (difficulty plus
    /// cook-time band), most viewed first.
    pub async fn popular_in_category(
        &self,
        recipe_id: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<CategoryPopularItem>, SearchError> {
        let started = Instant::now();
        let limit = effective_limit(limit);
        let seek = decode_seek(cursor, RankScope::CategoryPopular)?;

        let cache_key = cache::recommend_key(recipe_id, RankScope::CategoryPopular, cursor, limit);
        if let Some(page) = cache::read_envelope::<Page<CategoryPopularItem>>(
            self.cache.as_ref(),
            &cache_key,
            "category_popular.v1",
        )
        .await
        {
            return Ok(page);
        }

        let base = self.base_recipe(recipe_id).await?;
        let band = cook_time_band(base.cook_time_minutes);
        let category = category_label(base.difficulty.map(|d| d.as_str()), base.cook_time_minutes);

        let candidates = self
            .store
            .in_category(base.difficulty, band, recipe_id, self.config.candidate_pool)
            .await?;

        let rows: Vec<RankedRow<CategoryPopularItem>> = candidates
            .into_iter()
            .map(|candidate| RankedRow {
                primary: candidate.view_count as f64,
                secondary: candidate.exposure_score,
                id: candidate.id.clone(),
                payload: CategoryPopularItem {
                    id: candidate.id,
                    title: candidate.title,
                    thumbnail_url: candidate.thumbnail_url,
                    difficulty: candidate.difficulty.map(|d| d.as_str().to_string()),
                    cook_time_minutes: candidate.cook_time_minutes,
                    view_count: candidate.view_count,
                    category: category.clone(),
                    tags: candidate.tags,
                },
            })
            .collect();

        let page = rank_and_page(RankScope::CategoryPopular, rows, seek.as_ref(), limit);

        cache::write_envelope(
            self.cache.as_ref(),
            &cache_key,
            "category_popular.v1",
            &page,
            self.config.recommend_ttl,
        )
        .await;

        tracing::info!(
            recipe_id,
            category = %category,
            result_count = page.items.len(),
            has_more = page.has_more,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "category popular recipes retrieved"
        );
        Ok(page)
    }

    /// Drop every cached page derived from a recipe, plus its detail entry.
    /// Called when the ingestion process updates or deactivates a recipe.
    /// Best-effort: failures are logged and swallowed.
    pub async fn invalidate_recipe(&self, recipe_id: &str) {
        let mut removed = 0;
        for pattern in [
            cache::recipe_lists_pattern(recipe_id),
            cache::recipe_detail_key(recipe_id),
        ] {
            match self.cache.delete_pattern(&pattern).await {
                Ok(n) => removed += n,
                Err(e) => {
                    tracing::warn!(error = %e, recipe_id, pattern = %pattern, "cache invalidation failed");
                }
            }
        }
        tracing::info!(recipe_id, removed, "recipe cache invalidated");
    }

    async fn base_recipe(&self, recipe_id: &str) -> Result<Recipe, SearchError> {
        self.store
            .get(recipe_id)
            .await?
            .ok_or_else(|| SearchError::RecipeNotFound(recipe_id.to_string()))
    }
}

fn effective_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_RECOMMEND_LIMIT)
        .clamp(1, MAX_RECOMMEND_LIMIT)
}

fn decode_seek(cursor: Option<&str>, scope: RankScope) -> Result<Option<RankCursor>, SearchError> {
    Ok(cursor
        .map(|raw| RankCursor::decode_for(raw, scope))
        .transpose()?)
}

/// Order a ranked candidate list (primary desc, secondary desc, id asc),
/// apply the seek position, and assemble one page with the over-fetch
/// sentinel applied to the in-memory list.
fn rank_and_page<T>(
    scope: RankScope,
    mut rows: Vec<RankedRow<T>>,
    seek: Option<&RankCursor>,
    limit: usize,
) -> Page<T> {
    rows.sort_by(|a, b| {
        b.primary
            .total_cmp(&a.primary)
            .then_with(|| b.secondary.total_cmp(&a.secondary))
            .then_with(|| a.id.cmp(&b.id))
    });

    if let Some(seek) = seek {
        rows.retain(|row| ranked_after(row, seek));
    }
    rows.truncate(limit + 1);

    page::assemble(rows, limit, |row| {
        RankCursor {
            scope,
            primary: row.primary,
            secondary: row.secondary,
            id: row.id.clone(),
        }
        .encode()
    })
    .map(|row| row.payload)
}

/// Strictly after the cursor position under (primary desc, secondary desc,
/// id asc).
fn ranked_after<T>(row: &RankedRow<T>, seek: &RankCursor) -> bool {
    row.primary < seek.primary
        || (row.primary == seek.primary
            && (row.secondary < seek.secondary
                || (row.secondary == seek.secondary && row.id > seek.id)))
}

/// Cook-time bands used for the popular-in-category pivot: quick (≤15),
/// everyday (16–30), slow (31–60), and long-haul (61+).
fn cook_time_band(minutes: Option<i32>) -> Option<(i32, i32)> {
    let m = minutes?;
    Some(match m {
        ..=15 => (0, 15),
        16..=30 => (16, 30),
        31..=60 => (31, 60),
        _ => (61, i32::MAX),
    })
}

fn category_label(difficulty: Option<&str>, minutes: Option<i32>) -> String {
    let level = difficulty.unwrap_or("all levels");
    let time = match minutes {
        None => "any time",
        Some(..=15) => "15 min or less",
        Some(16..=30) => "30 min or less",
        Some(31..=60) => "1 hour or less",
        Some(_) => "over 1 hour",
    };
    format!("{level} / {time}")
}
