//! Opaque pagination cursors.
//!
//! A cursor is a compact JSON payload run through URL-safe base64 (no
//! padding), so it can ride in a query-string parameter untouched. Search
//! cursors carry the sort mode they were minted under; recommendation
//! cursors carry the endpoint scope. Replaying a cursor against a different
//! sort or endpoint is a client error, never silently tolerated.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{Recipe, RecipeId};
use crate::sort::{SortKey, SortMode};

/// Error decoding or validating a cursor. Maps uniformly to a 400-equivalent
/// at the (out-of-scope) HTTP layer.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("malformed cursor: {0}")]
    Malformed(String),

    #[error("cursor was minted under sort '{cursor}' but the request asked for '{requested}'")]
    SortMismatch { cursor: String, requested: String },

    #[error("cursor belongs to the '{cursor}' endpoint, not '{requested}'")]
    ScopeMismatch { cursor: String, requested: String },
}

/// Search pagination cursor: sort mode, sort position, tie-break id.
///
/// Wire form: `{"s": <sort>, "v": <value>, "i": <id>}`. The value's JSON type
/// depends on the sort mode (number for relevance/popularity, RFC 3339 string
/// for latest, number-or-null for cook_time).
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub sort: SortMode,
    pub key: SortKey,
    pub id: RecipeId,
}

impl Cursor {
    /// Mint a cursor from the last row of a page.
    pub fn for_row(sort: SortMode, recipe: &Recipe) -> Self {
        Self {
            sort,
            key: sort.position(recipe),
            id: recipe.id.clone(),
        }
    }

    pub fn encode(&self) -> String {
        let value = match &self.key {
            SortKey::Score(v) => json!(v),
            SortKey::Timestamp(ts) => json!(ts.to_rfc3339()),
            SortKey::Minutes(Some(m)) => json!(m),
            SortKey::Minutes(None) => Value::Null,
            SortKey::Views(v) => json!(v),
        };
        let payload = json!({ "s": self.sort.as_str(), "v": value, "i": self.id });
        URL_SAFE_NO_PAD.encode(payload.to_string())
    }

    pub fn decode(raw: &str) -> Result<Self, CursorError> {
        let payload = decode_payload(raw)?;
        let sort = payload
            .get("s")
            .and_then(Value::as_str)
            .and_then(SortMode::from_str)
            .ok_or_else(|| CursorError::Malformed("unknown or missing sort mode".to_string()))?;
        let id = field_str(&payload, "i")?;
        let value = payload
            .get("v")
            .ok_or_else(|| CursorError::Malformed("missing sort value".to_string()))?;

        let key = match sort {
            SortMode::Relevance => SortKey::Score(number_f64(value)?),
            SortMode::Latest => SortKey::Timestamp(timestamp(value)?),
            SortMode::CookTime => match value {
                Value::Null => SortKey::Minutes(None),
                other => SortKey::Minutes(Some(number_i32(other)?)),
            },
            SortMode::Popularity => SortKey::Views(number_i64(value)?),
        };

        Ok(Self { sort, key, id })
    }

    /// Decode and reject a cursor whose embedded sort mode differs from the
    /// one the request asked for.
    pub fn decode_for(raw: &str, requested: SortMode) -> Result<Self, CursorError> {
        let cursor = Self::decode(raw)?;
        if cursor.sort != requested {
            return Err(CursorError::SortMismatch {
                cursor: cursor.sort.as_str().to_string(),
                requested: requested.as_str().to_string(),
            });
        }
        Ok(cursor)
    }
}

/// Which recommendation endpoint a [`RankCursor`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankScope {
    Similar,
    SameChef,
    RelatedTags,
    CategoryPopular,
}

impl RankScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankScope::Similar => "similar",
            RankScope::SameChef => "same_chef",
            RankScope::RelatedTags => "related_tags",
            RankScope::CategoryPopular => "category_popular",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "similar" => Some(RankScope::Similar),
            "same_chef" => Some(RankScope::SameChef),
            "related_tags" => Some(RankScope::RelatedTags),
            "category_popular" => Some(RankScope::CategoryPopular),
            _ => None,
        }
    }
}

/// Cursor for in-process ranked lists (recommendation endpoints): primary
/// ranking value, secondary tie-break value, recipe id.
///
/// Wire form: `{"k": <scope>, "p": <primary>, "s": <secondary>, "i": <id>}`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankCursor {
    pub scope: RankScope,
    pub primary: f64,
    pub secondary: f64,
    pub id: RecipeId,
}

impl RankCursor {
    pub fn encode(&self) -> String {
        let payload = json!({
            "k": self.scope.as_str(),
            "p": self.primary,
            "s": self.secondary,
            "i": self.id,
        });
        URL_SAFE_NO_PAD.encode(payload.to_string())
    }

    /// Decode and reject a cursor minted by a different endpoint.
    pub fn decode_for(raw: &str, requested: RankScope) -> Result<Self, CursorError> {
        let payload = decode_payload(raw)?;
        let scope = payload
            .get("k")
            .and_then(Value::as_str)
            .and_then(RankScope::from_str)
            .ok_or_else(|| CursorError::Malformed("unknown or missing scope".to_string()))?;
        if scope != requested {
            return Err(CursorError::ScopeMismatch {
                cursor: scope.as_str().to_string(),
                requested: requested.as_str().to_string(),
            });
        }
        let primary = payload
            .get("p")
            .map(number_f64)
            .transpose()?
            .ok_or_else(|| CursorError::Malformed("missing primary value".to_string()))?;
        let secondary = payload
            .get("s")
            .map(number_f64)
            .transpose()?
            .ok_or_else(|| CursorError::Malformed("missing secondary value".to_string()))?;
        let id = field_str(&payload, "i")?;
        Ok(Self {
            scope,
            primary,
            secondary,
            id,
        })
    }
}

fn decode_payload(raw: &str) -> Result<Value, CursorError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(raw)
        .map_err(|e| CursorError::Malformed(format!("invalid base64: {e}")))?;
    let payload: Value = serde_json::from_slice(&bytes)
        .map_err(|e| CursorError::Malformed(format!("invalid payload: {e}")))?;
    if !payload.is_object() {
        return Err(CursorError::Malformed("payload is not an object".to_string()));
    }
    Ok(payload)
}

fn field_str(payload: &Value, key: &str) -> Result<String, CursorError> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CursorError::Malformed(format!("missing or non-string field '{key}'")))
}

fn number_f64(value: &Value) -> Result<f64, CursorError> {
    value
        .as_f64()
        .ok_or_else(|| CursorError::Malformed("expected a numeric sort value".to_string()))
}

fn number_i64(value: &Value) -> Result<i64, CursorError> {
    value
        .as_i64()
        .ok_or_else(|| CursorError::Malformed("expected an integer sort value".to_string()))
}

fn number_i32(value: &Value) -> Result<i32, CursorError> {
    let n = number_i64(value)?;
    i32::try_from(n).map_err(|_| CursorError::Malformed("sort value out of range".to_string()))
}

fn timestamp(value: &Value) -> Result<DateTime<Utc>, CursorError> {
    let s = value
        .as_str()
        .ok_or_else(|| CursorError::Malformed("expected a timestamp sort value".to_string()))?;
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CursorError::Malformed(format!("invalid timestamp: {e}")))
}
