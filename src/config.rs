//! Service configuration from environment variables.

use std::env;
use std::time::Duration;

/// Search pages are filter-combinatorial, so they expire quickly.
pub const DEFAULT_SEARCH_TTL_SECS: u64 = 300;
/// Recommendation pages are keyed per recipe and tolerate more staleness.
pub const DEFAULT_RECOMMEND_TTL_SECS: u64 = 600;
/// Single-recipe lookups outlive every list page.
pub const DEFAULT_DETAIL_TTL_SECS: u64 = 3600;

/// Candidate superset size for tag-driven recommendation queries.
pub const DEFAULT_CANDIDATE_POOL: usize = 200;
/// Candidate pool when the base recipe has no tags to pivot on.
pub const DEFAULT_FALLBACK_POOL: usize = 100;

/// Tunables shared by the search and recommendation services.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub search_ttl: Duration,
    pub recommend_ttl: Duration,
    pub detail_ttl: Duration,
    pub candidate_pool: usize,
    pub fallback_pool: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            search_ttl: Duration::from_secs(DEFAULT_SEARCH_TTL_SECS),
            recommend_ttl: Duration::from_secs(DEFAULT_RECOMMEND_TTL_SECS),
            detail_ttl: Duration::from_secs(DEFAULT_DETAIL_TTL_SECS),
            candidate_pool: DEFAULT_CANDIDATE_POOL,
            fallback_pool: DEFAULT_FALLBACK_POOL,
        }
    }
}

impl CoreConfig {
    /// Load configuration from the environment.
    ///
    /// Optional:
    /// - `COCOTTE_SEARCH_TTL_SECS` (default: 300)
    /// - `COCOTTE_RECOMMEND_TTL_SECS` (default: 600)
    /// - `COCOTTE_DETAIL_TTL_SECS` (default: 3600)
    /// - `COCOTTE_CANDIDATE_POOL` (default: 200)
    /// - `COCOTTE_FALLBACK_POOL` (default: 100)
    ///
    /// List pages must expire no later than single-recipe entries; a detail
    /// TTL configured below the list TTLs is raised to match.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut config = Self {
            search_ttl: secs_var("COCOTTE_SEARCH_TTL_SECS", defaults.search_ttl),
            recommend_ttl: secs_var("COCOTTE_RECOMMEND_TTL_SECS", defaults.recommend_ttl),
            detail_ttl: secs_var("COCOTTE_DETAIL_TTL_SECS", defaults.detail_ttl),
            candidate_pool: usize_var("COCOTTE_CANDIDATE_POOL", defaults.candidate_pool),
            fallback_pool: usize_var("COCOTTE_FALLBACK_POOL", defaults.fallback_pool),
        };

        let list_ceiling = config.search_ttl.max(config.recommend_ttl);
        if config.detail_ttl < list_ceiling {
            tracing::warn!(
                detail_secs = config.detail_ttl.as_secs(),
                list_secs = list_ceiling.as_secs(),
                "detail TTL below list TTLs, raising it"
            );
            config.detail_ttl = list_ceiling;
        }

        config
    }
}

fn secs_var(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

fn usize_var(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
