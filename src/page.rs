//! Page assembly via the over-fetch sentinel.
//!
//! Callers fetch `limit + 1` rows; the extra row only proves another page
//! exists and is never returned. The next cursor is minted from the last row
//! actually kept, and is absent whenever `has_more` is false.

use serde::{Deserialize, Serialize};

/// One page of results plus the continuation token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

/// Assemble a page from an over-fetched row set. `mint` derives the cursor
/// token from the last retained row.
pub fn assemble<T>(mut rows: Vec<T>, limit: usize, mint: impl Fn(&T) -> String) -> Page<T> {
    let has_more = rows.len() > limit;
    if has_more {
        rows.truncate(limit);
    }
    let next_cursor = if has_more {
        rows.last().map(&mint)
    } else {
        None
    };
    Page {
        items: rows,
        next_cursor,
        has_more,
    }
}
