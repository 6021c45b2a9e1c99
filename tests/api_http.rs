// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot with a
// stub gateway behind it.
//
// Covered:
// - GET /          (liveness)
// - GET /health
// - GET /api/popular, /api/news, /api/nyt (raw passthrough + error envelope)
// - CORS headers

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use feed_carousel::api::{self, AppState, LIVENESS_TEXT};
use feed_carousel::gateway::{FeedGateway, GatewayError, Result, Upstream};
use feed_carousel::ingest::providers::news::RawNewsList;
use feed_carousel::ingest::providers::social::RawSocialList;

const BODY_LIMIT: usize = 1024 * 1024;

struct StubGateway {
    social: std::result::Result<Json, GatewayError>,
    news: std::result::Result<Json, GatewayError>,
}

#[async_trait]
impl FeedGateway for StubGateway {
    async fn fetch_social_feed(&self) -> Result<RawSocialList> {
        self.social.clone().map(RawSocialList)
    }

    async fn fetch_news_feed(&self) -> Result<RawNewsList> {
        self.news.clone().map(RawNewsList)
    }
}

fn happy() -> StubGateway {
    StubGateway {
        social: Ok(json!({ "kind": "Listing", "data": { "children": [] } })),
        news: Ok(json!({ "status": "OK", "results": [ { "title": "x" } ] })),
    }
}

fn test_router(gw: StubGateway) -> Router {
    api::router(AppState::new(Arc::new(gw)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

#[tokio::test]
async fn root_returns_liveness_text() {
    let (status, body) = get(test_router(happy()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), LIVENESS_TEXT);
}

#[tokio::test]
async fn health_returns_ok() {
    let (status, body) = get(test_router(happy()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap().trim(), "OK");
}

#[tokio::test]
async fn popular_passes_upstream_payload_through() {
    let (status, body) = get(test_router(happy()), "/api/popular").await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&body).expect("json");
    assert_eq!(v, json!({ "kind": "Listing", "data": { "children": [] } }));
}

#[tokio::test]
async fn news_and_alias_serve_the_same_payload() {
    let (s1, b1) = get(test_router(happy()), "/api/news").await;
    let (s2, b2) = get(test_router(happy()), "/api/nyt").await;
    assert_eq!(s1, StatusCode::OK);
    assert_eq!(s2, StatusCode::OK);
    assert_eq!(b1, b2);
}

#[tokio::test]
async fn upstream_failure_becomes_500_envelope_with_upstream_body() {
    let gw = StubGateway {
        social: Err(GatewayError::upstream_fetch(
            Upstream::SocialFeed,
            Some(429),
            Some(json!({ "message": "Too Many Requests", "error": 429 })),
            "upstream returned HTTP 429",
        )),
        ..happy()
    };
    let (status, body) = get(test_router(gw), "/api/popular").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let v: Json = serde_json::from_slice(&body).expect("envelope json");
    assert_eq!(v["message"], "Error accessing social API");
    assert_eq!(v["error"]["error"], 429);
}

#[tokio::test]
async fn transport_failure_envelope_carries_message() {
    let gw = StubGateway {
        news: Err(GatewayError::transport(Upstream::NewsFeed, "timed out")),
        ..happy()
    };
    let (status, body) = get(test_router(gw), "/api/news").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let v: Json = serde_json::from_slice(&body).expect("envelope json");
    assert_eq!(v, json!({ "message": "Error accessing news API", "error": "timed out" }));
}

#[tokio::test]
async fn one_feed_failing_does_not_affect_the_other_endpoint() {
    let gw = StubGateway {
        social: Err(GatewayError::credential(Some(401), None, "token endpoint returned HTTP 401")),
        ..happy()
    };
    let app = test_router(gw);
    let (s_social, _) = get(app.clone(), "/api/popular").await;
    let (s_news, _) = get(app, "/api/news").await;
    assert_eq!(s_social, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(s_news, StatusCode::OK);
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let req = Request::builder()
        .method("GET")
        .uri("/api/news")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let resp = test_router(happy()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers().contains_key("access-control-allow-origin"),
        "missing CORS header: {:?}",
        resp.headers()
    );
}

#[tokio::test]
async fn preflight_is_answered() {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/popular")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "GET")
        .body(Body::empty())
        .unwrap();
    let resp = test_router(happy()).oneshot(req).await.unwrap();
    assert!(resp.status().is_success(), "preflight status {}", resp.status());
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}
