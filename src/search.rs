//! Search orchestration: cache lookup, query execution, page assembly.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::{self, PageCache};
use crate::config::CoreConfig;
use crate::cursor::Cursor;
use crate::error::SearchError;
use crate::models::{Chef, Recipe, Tag};
use crate::page::{self, Page};
use crate::query::{build_query, SearchParams};
use crate::store::RecipeStore;

const CACHE_SCHEMA: &str = "search.v1";

/// One recipe as returned by search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub difficulty: Option<String>,
    pub exposure_score: f64,
    pub chef: Option<Chef>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
}

impl SearchItem {
    fn from_recipe(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            thumbnail_url: recipe.thumbnail_url,
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            difficulty: recipe.difficulty.map(|d| d.as_str().to_string()),
            exposure_score: recipe.exposure_score,
            chef: recipe.chef,
            tags: recipe.tags,
            created_at: recipe.created_at,
        }
    }
}

/// Orchestrates recipe search over the query engine and the page cache.
///
/// The cache and store handles come in through the constructor; the
/// composition root owns their lifecycles.
pub struct SearchService {
    store: Arc<dyn RecipeStore>,
    cache: Arc<dyn PageCache>,
    config: CoreConfig,
}

impl SearchService {
    pub fn new(store: Arc<dyn RecipeStore>, cache: Arc<dyn PageCache>, config: CoreConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Run a search. Fails with a cursor error before touching the store,
    /// and with a store error if the query engine does; cache trouble only
    /// downgrades to the direct query path.
    pub async fn search(&self, params: &SearchParams) -> Result<Page<SearchItem>, SearchError> {
        let started = Instant::now();

        // Cursor validation first: a bad cursor is a client error and must
        // not cost a cache round-trip or a query.
        let query = build_query(params)?;
        let limit = params.effective_limit();

        tracing::info!(
            keyword = query.keyword.as_deref(),
            sort = query.sort.as_str(),
            limit,
            has_cursor = query.seek.is_some(),
            "search request started"
        );

        let cache_key = cache::search_key(params);
        if let Some(page) =
            cache::read_envelope::<Page<SearchItem>>(self.cache.as_ref(), &cache_key, CACHE_SCHEMA)
                .await
        {
            tracing::info!(
                cache_hit = true,
                result_count = page.items.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "search completed (cache hit)"
            );
            return Ok(page);
        }

        let rows = self.store.search(&query).await?;

        let sort = query.sort;
        let page = page::assemble(rows, limit, |row: &Recipe| {
            Cursor::for_row(sort, row).encode()
        })
        .map(SearchItem::from_recipe);

        cache::write_envelope(
            self.cache.as_ref(),
            &cache_key,
            CACHE_SCHEMA,
            &page,
            self.config.search_ttl,
        )
        .await;

        tracing::info!(
            cache_hit = false,
            result_count = page.items.len(),
            has_more = page.has_more,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search completed (store query)"
        );

        Ok(page)
    }
}
