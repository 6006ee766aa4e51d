//! Error taxonomy for the search and recommendation services.

use thiserror::Error;

use crate::cursor::CursorError;
use crate::store::StoreError;

/// Request-level failure. Cursor errors map to a 400-equivalent, not-found to
/// a 404-equivalent, and store errors to a 500-equivalent at the out-of-scope
/// HTTP layer. Cache failures never appear here — they degrade to the direct
/// store path.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
