//! Query plan construction for recipe search.
//!
//! Translates caller-supplied [`SearchParams`] into a [`RecipeQuery`]: the
//! predicate set, sort ordering, and cursor-continuation predicate that a
//! query engine executes. Cursor validation happens here, before any engine
//! call, so a bad cursor never costs a query.

use uuid::Uuid;

use crate::cursor::{Cursor, CursorError};
use crate::models::{Difficulty, Recipe};
use crate::sort::SortMode;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

/// Caller-supplied search parameters, assumed validated by the (out-of-scope)
/// HTTP layer. The limit is still clamped here regardless of what the caller
/// asked for.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Keyword matched against title, description, ingredient names, and
    /// chef names.
    pub q: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub max_cook_time: Option<i32>,
    /// Tag name filter.
    pub tag: Option<String>,
    pub chef_id: Option<Uuid>,
    pub sort: SortMode,
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

impl SearchParams {
    /// Keyword with whitespace collapsed and trimmed; empty becomes `None`.
    pub fn keyword(&self) -> Option<String> {
        let q = self.q.as_deref()?;
        let cleaned = q.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// An executable query specification: AND-combined filters, a sort mode, an
/// optional seek position, and the fetch size (page limit plus the sentinel
/// row).
#[derive(Debug, Clone)]
pub struct RecipeQuery {
    pub keyword: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub max_cook_time: Option<i32>,
    pub tag: Option<String>,
    pub chef_id: Option<Uuid>,
    pub sort: SortMode,
    pub seek: Option<Cursor>,
    pub fetch: usize,
}

/// Build a query plan from request parameters. Fails with [`CursorError`]
/// when the cursor is malformed or was minted under a different sort mode.
pub fn build_query(params: &SearchParams) -> Result<RecipeQuery, CursorError> {
    let seek = params
        .cursor
        .as_deref()
        .map(|raw| Cursor::decode_for(raw, params.sort))
        .transpose()?;

    Ok(RecipeQuery {
        keyword: params.keyword(),
        difficulty: params.difficulty,
        max_cook_time: params.max_cook_time,
        tag: params.tag.clone(),
        chef_id: params.chef_id,
        sort: params.sort,
        seek,
        fetch: params.effective_limit() + 1,
    })
}

impl RecipeQuery {
    /// Row-level semantics of this plan's predicate set. The in-memory engine
    /// evaluates this directly; a SQL engine translates each clause instead.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if !recipe.is_active {
            return false;
        }

        if let Some(keyword) = &self.keyword {
            if !keyword_matches(keyword, recipe) {
                return false;
            }
        }

        if let Some(difficulty) = self.difficulty {
            if recipe.difficulty != Some(difficulty) {
                return false;
            }
        }

        // Null cook time fails the bound: an unknown duration is never "at
        // most N minutes".
        if let Some(max) = self.max_cook_time {
            match recipe.cook_time_minutes {
                Some(minutes) if minutes <= max => {}
                _ => return false,
            }
        }

        if let Some(tag) = &self.tag {
            if !recipe.tags.iter().any(|t| &t.name == tag) {
                return false;
            }
        }

        if let Some(chef_id) = self.chef_id {
            if recipe.chef_id() != Some(chef_id) {
                return false;
            }
        }

        if let Some(seek) = &self.seek {
            if !self.sort.admits(&seek.key, &seek.id, recipe) {
                return false;
            }
        }

        true
    }
}

/// Case-insensitive substring match over title, description, ingredient
/// names, and chef name, OR-combined.
fn keyword_matches(keyword: &str, recipe: &Recipe) -> bool {
    let needle = keyword.to_lowercase();
    if recipe.title.to_lowercase().contains(&needle) {
        return true;
    }
    if let Some(description) = &recipe.description {
        if description.to_lowercase().contains(&needle) {
            return true;
        }
    }
    if recipe
        .ingredients
        .iter()
        .any(|i| i.name.to_lowercase().contains(&needle))
    {
        return true;
    }
    if let Some(chef) = &recipe.chef {
        if chef.name.to_lowercase().contains(&needle) {
            return true;
        }
    }
    false
}
