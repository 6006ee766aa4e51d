//! Shared fixtures for the integration suites: a recipe factory, a store
//! wrapper that counts engine calls, and a cache that always fails.

// Each integration binary compiles this module separately and uses a
// different subset of it.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use cocotte::cache::{CacheError, PageCache};
use cocotte::models::{Chef, Difficulty, Ingredient, Recipe, Tag};
use cocotte::query::RecipeQuery;
use cocotte::store::{MemoryStore, RecipeStore, StoreError};

pub fn recipe(id: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: format!("Recipe {id}"),
        description: None,
        thumbnail_url: None,
        difficulty: Some(Difficulty::Easy),
        prep_time_minutes: None,
        cook_time_minutes: Some(30),
        exposure_score: 0.0,
        view_count: 0,
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        chef: None,
        is_active: true,
        ingredients: vec![],
        tags: vec![],
        steps: vec![],
    }
}

pub fn tag(id: &str) -> Tag {
    Tag {
        id: id.to_string(),
        name: id.to_string(),
        category: None,
    }
}

pub fn ingredient(name: &str) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        amount: None,
        unit: None,
    }
}

pub fn chef(id: Uuid, name: &str) -> Chef {
    Chef {
        id,
        name: name.to_string(),
        profile_image_url: None,
    }
}

/// Delegates to a [`MemoryStore`] while counting engine calls, so tests can
/// assert that cache hits and early cursor rejection skip the engine.
pub struct CountingStore {
    inner: MemoryStore,
    pub search_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            inner: MemoryStore::new(recipes),
            search_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        }
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeStore for CountingStore {
    async fn search(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, StoreError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search(query).await
    }

    async fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn sharing_any_tag(
        &self,
        tag_ids: &[String],
        exclude: &str,
        cap: usize,
    ) -> Result<Vec<Recipe>, StoreError> {
        self.inner.sharing_any_tag(tag_ids, exclude, cap).await
    }

    async fn active_sample(&self, exclude: &str, cap: usize) -> Result<Vec<Recipe>, StoreError> {
        self.inner.active_sample(exclude, cap).await
    }

    async fn by_chef(
        &self,
        chef_id: Uuid,
        exclude: &str,
        cap: usize,
    ) -> Result<Vec<Recipe>, StoreError> {
        self.inner.by_chef(chef_id, exclude, cap).await
    }

    async fn in_category(
        &self,
        difficulty: Option<Difficulty>,
        cook_time_band: Option<(i32, i32)>,
        exclude: &str,
        cap: usize,
    ) -> Result<Vec<Recipe>, StoreError> {
        self.inner
            .in_category(difficulty, cook_time_band, exclude, cap)
            .await
    }
}

/// A cache whose every operation fails, for exercising the degraded path.
pub struct FailingCache;

#[async_trait]
impl PageCache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Backend("cache is down".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Backend("cache is down".to_string()))
    }

    async fn delete_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
        Err(CacheError::Backend("cache is down".to_string()))
    }
}
