//! End-to-end search behavior over the in-memory engine: filtering, sort
//! fidelity, cursor pagination, and cache degradation.

mod common;

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use uuid::Uuid;

use cocotte::{
    CoreConfig, CursorError, Difficulty, InMemoryCache, Page, Recipe, SearchError, SearchItem,
    SearchParams, SearchService, SortMode,
};
use common::{chef, ingredient, recipe, tag, CountingStore, FailingCache};

fn service(recipes: Vec<Recipe>) -> (SearchService, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::new(recipes));
    let cache = Arc::new(InMemoryCache::new());
    let service = SearchService::new(store.clone(), cache, CoreConfig::default());
    (service, store)
}

/// Ten recipes with distinct exposure scores 100, 90, ..., 10.
fn scored_fixture() -> Vec<Recipe> {
    (1..=10)
        .map(|n| {
            let mut r = recipe(&format!("r{n:02}"));
            r.exposure_score = (11 - n) as f64 * 10.0;
            r
        })
        .collect()
}

/// Follow `next_cursor` until exhaustion, returning the item ids per page.
async fn walk(
    service: &SearchService,
    mut params: SearchParams,
) -> Result<Vec<Vec<String>>, SearchError> {
    let mut pages = Vec::new();
    loop {
        let page: Page<SearchItem> = service.search(&params).await?;
        let ids: Vec<String> = page.items.iter().map(|i| i.id.clone()).collect();
        pages.push(ids);
        if !page.has_more {
            assert!(page.next_cursor.is_none(), "final page must carry no cursor");
            return Ok(pages);
        }
        assert!(page.next_cursor.is_some(), "has_more page must carry a cursor");
        params.cursor = page.next_cursor;
        assert!(pages.len() < 50, "pagination failed to terminate");
    }
}

#[tokio::test]
async fn relevance_pagination_visits_all_rows_in_score_order() {
    let (service, _) = service(scored_fixture());
    let pages = walk(
        &service,
        SearchParams {
            sort: SortMode::Relevance,
            limit: Some(3),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(pages.len(), 4);
    assert_eq!(pages[0], vec!["r01", "r02", "r03"]);
    assert_eq!(pages[1], vec!["r04", "r05", "r06"]);
    assert_eq!(pages[2], vec!["r07", "r08", "r09"]);
    assert_eq!(pages[3], vec!["r10"]);
}

#[tokio::test]
async fn every_sort_mode_paginates_without_skips_or_duplicates() {
    let epoch = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let recipes: Vec<Recipe> = (0..11)
        .map(|n| {
            let mut r = recipe(&format!("r{n:02}"));
            r.exposure_score = ((n * 7) % 5) as f64; // deliberate score ties
            r.view_count = ((n * 3) % 4) as i64;
            r.created_at = epoch + ChronoDuration::hours(n);
            r.cook_time_minutes = if n % 3 == 0 { None } else { Some(10 + n as i32) };
            r
        })
        .collect();

    for sort in [
        SortMode::Relevance,
        SortMode::Latest,
        SortMode::CookTime,
        SortMode::Popularity,
    ] {
        let (service, _) = service(recipes.clone());
        let pages = walk(
            &service,
            SearchParams {
                sort,
                limit: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let mut seen: Vec<String> = pages.into_iter().flatten().collect();
        assert_eq!(seen.len(), 11, "sort {sort:?} lost or duplicated rows");
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 11, "sort {sort:?} duplicated rows");
    }
}

#[tokio::test]
async fn cook_time_sort_is_non_decreasing_with_nulls_at_the_end() {
    let recipes: Vec<Recipe> = [Some(40), None, Some(10), Some(25), None, Some(10)]
        .iter()
        .enumerate()
        .map(|(n, minutes)| {
            let mut r = recipe(&format!("r{n}"));
            r.cook_time_minutes = *minutes;
            r
        })
        .collect();

    let (service, _) = service(recipes);
    let pages = walk(
        &service,
        SearchParams {
            sort: SortMode::CookTime,
            limit: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let items: Vec<Option<i32>> = pages
        .iter()
        .flatten()
        .map(|id| {
            // reconstruct the minutes from the fixture index in the id
            let n: usize = id[1..].parse().unwrap();
            [Some(40), None, Some(10), Some(25), None, Some(10)][n]
        })
        .collect();

    let first_null = items.iter().position(|m| m.is_none()).unwrap();
    let (timed, nulls) = items.split_at(first_null);
    assert!(nulls.iter().all(|m| m.is_none()), "nulls must form the tail");
    assert!(
        timed.windows(2).all(|w| w[0].unwrap() <= w[1].unwrap()),
        "cook times must be non-decreasing: {timed:?}"
    );
}

#[tokio::test]
async fn latest_sort_is_non_increasing() {
    let epoch = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let recipes: Vec<Recipe> = (0..7)
        .map(|n| {
            let mut r = recipe(&format!("r{n}"));
            r.created_at = epoch + ChronoDuration::days((n * 13) % 7);
            r
        })
        .collect();

    let store = Arc::new(CountingStore::new(recipes));
    let service = SearchService::new(
        store,
        Arc::new(InMemoryCache::new()),
        CoreConfig::default(),
    );
    let page = service
        .search(&SearchParams {
            sort: SortMode::Latest,
            ..Default::default()
        })
        .await
        .unwrap();

    let stamps: Vec<_> = page.items.iter().map(|i| i.created_at).collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn difficulty_and_cook_time_filters_combine() {
    let mut fixtures = Vec::new();
    let mut quick_easy = recipe("quick-easy");
    quick_easy.difficulty = Some(Difficulty::Easy);
    quick_easy.cook_time_minutes = Some(20);
    fixtures.push(quick_easy);

    let mut slow_easy = recipe("slow-easy");
    slow_easy.difficulty = Some(Difficulty::Easy);
    slow_easy.cook_time_minutes = Some(90);
    fixtures.push(slow_easy);

    let mut quick_hard = recipe("quick-hard");
    quick_hard.difficulty = Some(Difficulty::Hard);
    quick_hard.cook_time_minutes = Some(10);
    fixtures.push(quick_hard);

    // unknown duration fails a max_cook_time bound
    let mut untimed_easy = recipe("untimed-easy");
    untimed_easy.difficulty = Some(Difficulty::Easy);
    untimed_easy.cook_time_minutes = None;
    fixtures.push(untimed_easy);

    let (service, _) = service(fixtures);
    let page = service
        .search(&SearchParams {
            difficulty: Some(Difficulty::Easy),
            max_cook_time: Some(30),
            ..Default::default()
        })
        .await
        .unwrap();

    let ids: Vec<&str> = page.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["quick-easy"]);
}

#[tokio::test]
async fn keyword_reaches_ingredients_and_chef_names() {
    let mut by_title = recipe("by-title");
    by_title.title = "Tomato Galette".to_string();

    let mut by_ingredient = recipe("by-ingredient");
    by_ingredient.ingredients = vec![ingredient("tomato paste")];

    let mut by_chef = recipe("by-chef");
    by_chef.chef = Some(chef(Uuid::nil(), "Toma Tomasson"));

    let unrelated = recipe("unrelated");

    let (service, _) = service(vec![by_title, by_ingredient, by_chef, unrelated]);
    let page = service
        .search(&SearchParams {
            q: Some("tomA".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut ids: Vec<&str> = page.items.iter().map(|i| i.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["by-chef", "by-ingredient", "by-title"]);
}

#[tokio::test]
async fn tag_filter_requires_membership() {
    let mut tagged = recipe("tagged");
    tagged.tags = vec![tag("dinner")];
    let plain = recipe("plain");

    let (service, _) = service(vec![tagged, plain]);
    let page = service
        .search(&SearchParams {
            tag: Some("dinner".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<&str> = page.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["tagged"]);
}

#[tokio::test]
async fn cross_sort_cursor_is_rejected_before_the_engine_runs() {
    let (service, store) = service(scored_fixture());
    let first = service
        .search(&SearchParams {
            sort: SortMode::Latest,
            limit: Some(3),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(store.searches(), 1);

    let err = service
        .search(&SearchParams {
            sort: SortMode::Relevance,
            cursor: first.next_cursor,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SearchError::Cursor(CursorError::SortMismatch { .. })
    ));
    assert_eq!(store.searches(), 1, "mismatched cursor must not reach the engine");
}

#[tokio::test]
async fn malformed_cursor_is_rejected_before_the_engine_runs() {
    let (service, store) = service(scored_fixture());
    let err = service
        .search(&SearchParams {
            cursor: Some("*** not a cursor ***".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SearchError::Cursor(CursorError::Malformed(_))
    ));
    assert_eq!(store.searches(), 0);
}

#[tokio::test]
async fn identical_requests_are_served_from_cache() {
    let (service, store) = service(scored_fixture());
    let params = SearchParams {
        sort: SortMode::Popularity,
        limit: Some(5),
        ..Default::default()
    };

    let first = service.search(&params).await.unwrap();
    let second = service.search(&params).await.unwrap();

    assert_eq!(store.searches(), 1, "second request must be a cache hit");
    let first_ids: Vec<_> = first.items.iter().map(|i| i.id.clone()).collect();
    let second_ids: Vec<_> = second.items.iter().map(|i| i.id.clone()).collect();
    assert_eq!(first_ids, second_ids);
    assert_eq!(first.has_more, second.has_more);
}

#[tokio::test]
async fn a_dead_cache_degrades_to_the_engine_path() {
    let store = Arc::new(CountingStore::new(scored_fixture()));
    let service = SearchService::new(store.clone(), Arc::new(FailingCache), CoreConfig::default());

    let params = SearchParams {
        limit: Some(3),
        ..Default::default()
    };
    let page = service.search(&params).await.unwrap();
    assert_eq!(page.items.len(), 3);

    // no caching possible, so every request pays the engine
    service.search(&params).await.unwrap();
    assert_eq!(store.searches(), 2);
}

#[tokio::test]
async fn empty_result_set_is_a_clean_final_page() {
    let (service, _) = service(scored_fixture());
    let page = service
        .search(&SearchParams {
            q: Some("no such dish".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert!(!page.has_more);
    assert!(page.next_cursor.is_none());
}
