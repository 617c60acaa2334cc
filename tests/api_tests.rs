//! HTTP API tests
//!
//! Exercises the JSON endpoints under /api end to end against an in-memory
//! store.

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{json, Value};

use snaplink::config::AppConfig;
use snaplink::runtime::AppState;

// =============================================================================
// Test Setup
// =============================================================================

fn test_state() -> AppState {
    let mut config = AppConfig::default();
    config.server.public_url = Some("http://sl.test".to_string());
    AppState::from_config(&config)
}

macro_rules! init_app {
    ($state:expr) => {{
        let state = $state.clone();
        test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await
    }};
}

macro_rules! shorten {
    ($app:expr, $body:expr) => {{
        let req = TestRequest::post()
            .uri("/api/shorten")
            .set_json($body)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

// =============================================================================
// POST /api/shorten
// =============================================================================

#[actix_rt::test]
async fn test_shorten_generates_code() {
    let state = test_state();
    let app = init_app!(state);

    let resp = shorten!(app, json!({"url": "https://example.com"}));
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    let code = body["data"]["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert_eq!(body["data"]["id"], code);
    assert_eq!(body["data"]["originalUrl"], "https://example.com");
    assert_eq!(body["data"]["clicks"], 0);
    assert_eq!(body["data"]["customCode"], false);
    assert_eq!(body["shortUrl"], format!("http://sl.test/{}", code));

    assert!(state.store.get(code).is_some());
}

#[actix_rt::test]
async fn test_shorten_with_custom_code() {
    let state = test_state();
    let app = init_app!(state);

    let resp = shorten!(
        app,
        json!({"url": "https://docs.example.com", "customCode": "docs"})
    );
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["shortCode"], "docs");
    assert_eq!(body["data"]["customCode"], true);
    assert_eq!(body["shortUrl"], "http://sl.test/docs");
}

#[actix_rt::test]
async fn test_shorten_missing_url() {
    let state = test_state();
    let app = init_app!(state);

    for payload in [json!({}), json!({"url": ""}), json!({"customCode": "x"})] {
        let resp = shorten!(app, payload);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "URL is required");
    }
    assert!(state.store.is_empty());
}

#[actix_rt::test]
async fn test_shorten_invalid_url() {
    let state = test_state();
    let app = init_app!(state);

    for url in ["not a url", "example.com", "/relative/path"] {
        let resp = shorten!(app, json!({ "url": url }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid URL format");
    }
    assert!(state.store.is_empty());
}

#[actix_rt::test]
async fn test_shorten_rejects_script_and_local_schemes() {
    let state = test_state();
    let app = init_app!(state);

    for url in [
        "javascript:alert(document.cookie)",
        "data:text/html;base64,PHNjcmlwdD4=",
        "file:///etc/passwd",
    ] {
        let resp = shorten!(app, json!({ "url": url }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid URL format");
    }
    assert!(state.store.is_empty());
}

#[actix_rt::test]
async fn test_shorten_non_string_url() {
    let state = test_state();
    let app = init_app!(state);

    // Falsy values count as missing
    for payload in [json!({"url": null}), json!({"url": 0}), json!({"url": false})] {
        let resp = shorten!(app, payload);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "URL is required");
    }

    for payload in [
        json!({"url": 123}),
        json!({"url": true}),
        json!({"url": ["https://example.com"]}),
        json!({"url": {"href": "https://example.com"}}),
    ] {
        let resp = shorten!(app, payload);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid URL format");
    }
    assert!(state.store.is_empty());
}

#[actix_rt::test]
async fn test_shorten_duplicate_custom_code_does_not_mutate() {
    let state = test_state();
    let app = init_app!(state);

    let resp = shorten!(
        app,
        json!({"url": "https://first.example.com", "customCode": "dup"})
    );
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = shorten!(
        app,
        json!({"url": "https://second.example.com", "customCode": "dup"})
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Custom code already exists");

    assert_eq!(state.store.len(), 1);
    assert_eq!(
        state.store.get("dup").unwrap().original_url,
        "https://first.example.com"
    );
}

#[actix_rt::test]
async fn test_shorten_invalid_custom_code() {
    let state = test_state();
    let app = init_app!(state);

    for code in ["has space", "a/b", "api"] {
        let resp = shorten!(
            app,
            json!({"url": "https://example.com", "customCode": code})
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid custom code");
    }
    assert!(state.store.is_empty());
}

#[actix_rt::test]
async fn test_shorten_malformed_json() {
    let state = test_state();
    let app = init_app!(state);

    let req = TestRequest::post()
        .uri("/api/shorten")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid request body");
}

// =============================================================================
// GET /api/urls
// =============================================================================

#[actix_rt::test]
async fn test_list_urls_in_creation_order() {
    let state = test_state();
    let app = init_app!(state);

    let req = TestRequest::get().uri("/api/urls").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"success": true, "data": []}));

    for code in ["one", "two", "three"] {
        let resp = shorten!(
            app,
            json!({"url": format!("https://{}.example.com", code), "customCode": code})
        );
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = TestRequest::get().uri("/api/urls").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["shortCode"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["one", "two", "three"]);
}

// =============================================================================
// GET /api/analytics/{code}
// =============================================================================

#[actix_rt::test]
async fn test_analytics_includes_click_history() {
    let state = test_state();
    let app = init_app!(state);

    shorten!(app, json!({"url": "https://example.com", "customCode": "stats"}));

    for agent in ["agent-a", "agent-b"] {
        let req = TestRequest::get()
            .uri("/stats")
            .insert_header(("User-Agent", agent))
            .insert_header(("X-Forwarded-For", "198.51.100.20"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
    }

    let req = TestRequest::get().uri("/api/analytics/stats").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["shortCode"], "stats");
    assert_eq!(body["data"]["clicks"], 2);

    let history = body["data"]["clickHistory"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["userAgent"], "agent-a");
    assert_eq!(history[1]["userAgent"], "agent-b");
    assert_eq!(history[0]["ip"], "198.51.100.20");
    assert!(history[0]["timestamp"].is_string());
}

#[actix_rt::test]
async fn test_analytics_unknown_code() {
    let state = test_state();
    let app = init_app!(state);

    let req = TestRequest::get().uri("/api/analytics/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "URL not found");
}

// =============================================================================
// DELETE /api/urls/{code}
// =============================================================================

#[actix_rt::test]
async fn test_delete_removes_everywhere() {
    let state = test_state();
    let app = init_app!(state);

    shorten!(app, json!({"url": "https://example.com", "customCode": "bye"}));
    let req = TestRequest::get().uri("/bye").to_request();
    test::call_service(&app, req).await;

    let req = TestRequest::delete().uri("/api/urls/bye").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"success": true, "message": "URL deleted successfully"})
    );

    // Gone from listing
    let req = TestRequest::get().uri("/api/urls").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // Gone from analytics
    let req = TestRequest::get().uri("/api/analytics/bye").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Redirect and second delete both 404
    let req = TestRequest::get().uri("/bye").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::delete().uri("/api/urls/bye").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "URL not found");
}

// =============================================================================
// GET /api/health
// =============================================================================

#[actix_rt::test]
async fn test_health_totals_track_store() {
    let state = test_state();
    let app = init_app!(state);

    let health = |body: &Value| {
        (
            body["stats"]["totalUrls"].as_u64().unwrap(),
            body["stats"]["totalClicks"].as_u64().unwrap(),
        )
    };

    let req = TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "URL Shortener API is running");
    assert_eq!(health(&body), (0, 0));

    shorten!(app, json!({"url": "https://a.example.com", "customCode": "a"}));
    shorten!(app, json!({"url": "https://b.example.com", "customCode": "b"}));
    for uri in ["/a", "/a", "/b"] {
        let req = TestRequest::get().uri(uri).to_request();
        test::call_service(&app, req).await;
    }

    let req = TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health(&body), (2, 3));

    // Delete and re-create: the old clicks must not linger
    let req = TestRequest::delete().uri("/api/urls/a").to_request();
    test::call_service(&app, req).await;
    shorten!(app, json!({"url": "https://a.example.com", "customCode": "a"}));

    let req = TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health(&body), (2, 1));

    let stats = state.store.stats();
    assert_eq!(stats.total_urls, 2);
    assert_eq!(stats.total_clicks, 1);
}

// =============================================================================
// Misc
// =============================================================================

#[actix_rt::test]
async fn test_unknown_api_path_is_json_404() {
    let state = test_state();
    let app = init_app!(state);

    let req = TestRequest::get().uri("/api/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not found");
}
