//! Integration tests for the users list page.

use axum::http::StatusCode;
use httpmock::prelude::*;
use roster_integration_tests::{TestContext, many_users, user_json};
use serde_json::json;

#[tokio::test]
async fn test_list_paginates_sorted_by_id() {
    let ctx = TestContext::new();
    ctx.store.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(many_users(25));
    });

    let page3 = ctx.get("/?page=3").await;
    assert_eq!(page3.status, StatusCode::OK);
    assert!(page3.body.contains("<td>User21</td>"));
    assert!(page3.body.contains("<td>User25</td>"));
    assert!(!page3.body.contains("<td>User20</td>"));
    assert!(page3.body.contains("Showing 21–25 of 25"));
    assert!(page3.body.contains("aria-label=\"Pagination\""));

    let page1 = ctx.get("/").await;
    assert!(page1.body.contains("<td>User1</td>"));
    assert!(page1.body.contains("<td>User10</td>"));
    assert!(!page1.body.contains("<td>User11</td>"));
}

#[tokio::test]
async fn test_list_served_from_cache() {
    let ctx = TestContext::new();
    let list = ctx.store.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(many_users(3));
    });

    ctx.get("/").await;
    ctx.get("/?sort=email&dir=desc").await;
    ctx.get("/?page=1").await;
    assert_eq!(list.calls(), 1);
}

#[tokio::test]
async fn test_sort_by_last_name_is_locale_aware() {
    let ctx = TestContext::new();
    ctx.store.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(json!([
            user_json(1, "Zed", "Zoe", "2024-01-01T00:00:00.000Z"),
            user_json(2, "Eve", "Émile", "2024-01-02T00:00:00.000Z"),
            user_json(3, "Ann", "adams", "2024-01-03T00:00:00.000Z"),
        ]));
    });

    let asc = ctx.get("/?sort=lastName&dir=asc").await;
    let adams = asc.body.find("<td>adams</td>").unwrap_or(usize::MAX);
    let emile = asc.body.find("<td>Émile</td>").unwrap_or(usize::MAX);
    let zoe = asc.body.find("<td>Zoe</td>").unwrap_or(usize::MAX);
    assert!(adams < emile && emile < zoe, "ascending order wrong");

    let desc = ctx.get("/?sort=lastName&dir=desc").await;
    let adams = desc.body.find("<td>adams</td>").unwrap_or(usize::MAX);
    let zoe = desc.body.find("<td>Zoe</td>").unwrap_or(usize::MAX);
    assert!(zoe < adams, "descending order wrong");
    // The active header links to the flipped direction.
    assert!(desc.links_to("/?sort=lastName&dir=asc&page=1"));
}

#[tokio::test]
async fn test_unknown_params_fall_back_to_defaults() {
    let ctx = TestContext::new();
    ctx.store.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(many_users(12));
    });

    let response = ctx.get("/?sort=bogus&dir=up&page=x").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<td>User1</td>"));
    assert!(response.body.contains("Showing 1–10 of 12"));
}

#[tokio::test]
async fn test_out_of_range_page_is_empty() {
    let ctx = TestContext::new();
    ctx.store.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(many_users(5));
    });

    let response = ctx.get("/?page=9").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("<td>User1</td>"));
    assert!(response.body.contains("No rows on this page"));
}

#[tokio::test]
async fn test_single_page_has_no_pagination() {
    let ctx = TestContext::new();
    ctx.store.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(many_users(4));
    });

    let response = ctx.get("/").await;
    assert!(!response.body.contains("aria-label=\"Pagination\""));
}

#[tokio::test]
async fn test_registration_date_is_formatted() {
    let ctx = TestContext::new();
    ctx.store.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(json!([
            user_json(1, "Anna", "Ivanova", "2024-03-01T12:00:00.000Z"),
            user_json(2, "Boris", "Orlov", "not a date"),
        ]));
    });

    let response = ctx.get("/").await;
    assert!(response.body.contains("<td>01.03.2024</td>"));
    assert!(response.body.contains("<td>not a date</td>"));
}

#[tokio::test]
async fn test_load_failure_renders_error_panel() {
    let ctx = TestContext::new();
    ctx.store.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(500).body("database offline");
    });

    let response = ctx.get("/").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.body.contains("Failed to load users"));
    assert!(!response.body.contains("<tbody>"));
}

#[tokio::test]
async fn test_empty_store_shows_empty_state() {
    let ctx = TestContext::new();
    ctx.store.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(json!([]));
    });

    let response = ctx.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No users found"));
}

#[tokio::test]
async fn test_refresh_refetches() {
    let ctx = TestContext::new();
    let list = ctx.store.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(many_users(2));
    });

    ctx.get("/").await;
    let refresh = ctx.post_form("/refresh", &[]).await;
    assert!(refresh.redirects_to_list());

    ctx.get("/").await;
    assert_eq!(list.calls(), 2);
}
