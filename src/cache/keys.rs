//! Deterministic cache-key derivation.
//!
//! Search keys hash the full parameter set into a fixed-width suffix, so a
//! 100-character keyword and an empty one produce keys of the same size.
//! Optional fields are normalized to explicit placeholders before hashing:
//! an omitted filter and its default hash identically, and any single field
//! change produces a different key. Recommendation keys keep the recipe id
//! in the clear so pattern invalidation can target one recipe.

use serde_json::json;
use sha2::{Digest, Sha256};

use crate::cursor::RankScope;
use crate::query::SearchParams;

/// Hash suffix length in hex characters.
const HASH_WIDTH: usize = 16;

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..HASH_WIDTH / 2])
}

/// Key for a search page: `search:recipes:<hash>`.
pub fn search_key(params: &SearchParams) -> String {
    // serde_json orders object keys, so the canonical form is stable no
    // matter how this map is built.
    let canonical = json!({
        "q": params.keyword().unwrap_or_default(),
        "d": params.difficulty.map(|d| d.as_str()).unwrap_or(""),
        "t": params.max_cook_time.unwrap_or(0),
        "tag": params.tag.as_deref().unwrap_or(""),
        "c": params.chef_id.map(|id| id.to_string()).unwrap_or_default(),
        "s": params.sort.as_str(),
        "cur": params.cursor.as_deref().unwrap_or(""),
        "l": params.effective_limit(),
    });
    format!("search:recipes:{}", short_hash(&canonical.to_string()))
}

/// Key for a recommendation page: `recipes:<id>:<scope>:<hash>`.
pub fn recommend_key(recipe_id: &str, scope: RankScope, cursor: Option<&str>, limit: usize) -> String {
    let canonical = json!({
        "cur": cursor.unwrap_or(""),
        "l": limit,
    });
    format!(
        "recipes:{}:{}:{}",
        recipe_id,
        scope.as_str(),
        short_hash(&canonical.to_string())
    )
}

/// Key for a single-recipe detail entry.
pub fn recipe_detail_key(recipe_id: &str) -> String {
    format!("recipe:{recipe_id}")
}

/// Pattern matching every recommendation page derived from a recipe.
pub fn recipe_lists_pattern(recipe_id: &str) -> String {
    format!("recipes:{recipe_id}:*")
}
