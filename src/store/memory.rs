//! In-memory query engine over a fixed recipe set.

use async_trait::async_trait;
use uuid::Uuid;

use super::{RecipeStore, StoreError};
use crate::models::{Difficulty, Recipe};
use crate::query::RecipeQuery;

/// A [`RecipeStore`] over an owned `Vec<Recipe>`.
///
/// Candidate queries return rows in id order so results are deterministic
/// across runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: Vec<Recipe>,
}

impl MemoryStore {
    pub fn new(mut recipes: Vec<Recipe>) -> Self {
        recipes.sort_by(|a, b| a.id.cmp(&b.id));
        Self { recipes }
    }

    fn active(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter().filter(|r| r.is_active)
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn search(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, StoreError> {
        let mut rows: Vec<Recipe> = self
            .recipes
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| query.sort.compare(a, b));
        rows.truncate(query.fetch);
        Ok(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        Ok(self.active().find(|r| r.id == id).cloned())
    }

    async fn sharing_any_tag(
        &self,
        tag_ids: &[String],
        exclude: &str,
        cap: usize,
    ) -> Result<Vec<Recipe>, StoreError> {
        let rows = self
            .active()
            .filter(|r| r.id != exclude)
            .filter(|r| r.tags.iter().any(|t| tag_ids.contains(&t.id)))
            .take(cap)
            .cloned()
            .collect();
        Ok(rows)
    }

    async fn active_sample(&self, exclude: &str, cap: usize) -> Result<Vec<Recipe>, StoreError> {
        let rows = self
            .active()
            .filter(|r| r.id != exclude)
            .take(cap)
            .cloned()
            .collect();
        Ok(rows)
    }

    async fn by_chef(
        &self,
        chef_id: Uuid,
        exclude: &str,
        cap: usize,
    ) -> Result<Vec<Recipe>, StoreError> {
        let rows = self
            .active()
            .filter(|r| r.id != exclude)
            .filter(|r| r.chef_id() == Some(chef_id))
            .take(cap)
            .cloned()
            .collect();
        Ok(rows)
    }

    async fn in_category(
        &self,
        difficulty: Option<Difficulty>,
        cook_time_band: Option<(i32, i32)>,
        exclude: &str,
        cap: usize,
    ) -> Result<Vec<Recipe>, StoreError> {
        let rows = self
            .active()
            .filter(|r| r.id != exclude)
            .filter(|r| difficulty.is_none() || r.difficulty == difficulty)
            .filter(|r| match cook_time_band {
                Some((lo, hi)) => r
                    .cook_time_minutes
                    .map(|m| m >= lo && m <= hi)
                    .unwrap_or(false),
                None => true,
            })
            .take(cap)
            .cloned()
            .collect();
        Ok(rows)
    }
}
