//! Query-engine boundary.
//!
//! The real engine lives in the out-of-scope data-access layer; this crate
//! only consumes the interface. [`MemoryStore`] is the in-tree
//! implementation used by tests and local tooling — it executes a
//! [`RecipeQuery`](crate::query::RecipeQuery) literally, which also makes it
//! the reference semantics for any SQL translation.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Difficulty, Recipe};
use crate::query::RecipeQuery;

/// Failure inside the query engine. Fatal to the request; never retried at
/// this layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query engine error: {0}")]
    Query(String),
}

/// Read access to the recipe read model. Every method sees active recipes
/// only.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Execute a search plan: filters, sort, seek, and fetch size included.
    async fn search(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, StoreError>;

    /// Fetch one active recipe with its collections.
    async fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError>;

    /// Bounded candidate superset: recipes sharing at least one of the given
    /// tag ids, excluding `exclude`.
    async fn sharing_any_tag(
        &self,
        tag_ids: &[String],
        exclude: &str,
        cap: usize,
    ) -> Result<Vec<Recipe>, StoreError>;

    /// Bounded fallback candidate set when the base recipe carries no tags.
    async fn active_sample(&self, exclude: &str, cap: usize) -> Result<Vec<Recipe>, StoreError>;

    /// Bounded candidate set of recipes by the same chef.
    async fn by_chef(
        &self,
        chef_id: Uuid,
        exclude: &str,
        cap: usize,
    ) -> Result<Vec<Recipe>, StoreError>;

    /// Bounded candidate set within a category: matching difficulty (when
    /// given) and cook-time band (when given, inclusive minutes).
    async fn in_category(
        &self,
        difficulty: Option<Difficulty>,
        cook_time_band: Option<(i32, i32)>,
        exclude: &str,
        cap: usize,
    ) -> Result<Vec<Recipe>, StoreError>;
}
