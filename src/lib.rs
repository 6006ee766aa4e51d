//! Search and recommendation core for the Cocotte recipe platform.
//!
//! This crate owns the cursor-based pagination and similarity-ranking engine
//! behind the search and recommendation endpoints. The HTTP layer, the
//! relational query engine, and the Redis deployment are external
//! collaborators, reached through the [`store::RecipeStore`] and
//! [`cache::PageCache`] traits.

pub mod cache;
pub mod config;
pub mod cursor;
pub mod error;
pub mod models;
pub mod page;
pub mod query;
pub mod recipes;
pub mod recommend;
pub mod search;
pub mod similarity;
pub mod sort;
pub mod store;

pub use cache::{InMemoryCache, PageCache, RedisCache};
pub use config::CoreConfig;
pub use cursor::{Cursor, CursorError, RankCursor, RankScope};
pub use error::SearchError;
pub use models::{Chef, Difficulty, Ingredient, Recipe, RecipeId, Step, Tag};
pub use page::Page;
pub use query::{build_query, RecipeQuery, SearchParams};
pub use recipes::{RecipeDetail, RecipeDetailService};
pub use recommend::{
    CategoryPopularItem, RelatedByTagsItem, SameChefItem, SimilarItem, SimilarRecipeService,
};
pub use search::{SearchItem, SearchService};
pub use sort::{SortKey, SortMode};
pub use store::{MemoryStore, RecipeStore, StoreError};
