// tests/support/mod.rs
//
// In-process fake of the two upstream providers, served by axum on an
// ephemeral port. Each test configures the responses and inspects what the
// gateway actually sent.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use feed_carousel::config::gateway::{
    ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_NEWS_API_KEY, ENV_PASSWORD, ENV_POPULAR_URL,
    ENV_TIMEOUT_SECS, ENV_TOKEN_URL, ENV_TOP_STORIES_URL, ENV_USERNAME, ENV_USER_AGENT,
};
use feed_carousel::GatewayConfig;

pub const CLIENT_SECRET: &str = "client-secret-value";
pub const PASSWORD: &str = "service-password-value";
pub const API_KEY: &str = "news-api-key-value";
pub const ACCESS_TOKEN: &str = "bearer-token-value";
pub const USER_AGENT: &str = "feed-carousel-tests/1.0";

#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
            delay: None,
        }
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            delay: None,
        }
    }

    pub fn delayed(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }
}

#[derive(Clone)]
pub struct Behavior {
    pub token: Reply,
    pub popular: Reply,
    pub news: Reply,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            token: Reply::ok(json!({
                "access_token": ACCESS_TOKEN,
                "token_type": "bearer",
                "expires_in": 86400,
                "scope": "*"
            })),
            popular: Reply::ok(social_listing(3)),
            news: Reply::ok(news_payload(5)),
        }
    }
}

#[derive(Default)]
pub struct Seen {
    pub token_hits: AtomicUsize,
    pub popular_hits: AtomicUsize,
    pub news_hits: AtomicUsize,
    pub token_auth: Mutex<Option<String>>,
    pub token_form: Mutex<Option<String>>,
    pub popular_auth: Mutex<Option<String>>,
    pub news_query: Mutex<Option<String>>,
    pub user_agents: Mutex<Vec<String>>,
}

impl Seen {
    pub fn token(&self) -> usize {
        self.token_hits.load(Ordering::SeqCst)
    }
    pub fn popular(&self) -> usize {
        self.popular_hits.load(Ordering::SeqCst)
    }
    pub fn news(&self) -> usize {
        self.news_hits.load(Ordering::SeqCst)
    }

    fn note_agent(&self, headers: &HeaderMap) {
        let ua = header(headers, "user-agent").unwrap_or_default();
        self.user_agents.lock().unwrap().push(ua);
    }
}

#[derive(Clone)]
struct FakeState {
    behavior: Arc<Behavior>,
    seen: Arc<Seen>,
}

pub struct FakeUpstream {
    pub base: String,
    pub seen: Arc<Seen>,
}

impl FakeUpstream {
    pub async fn spawn(behavior: Behavior) -> Self {
        let seen = Arc::new(Seen::default());
        let state = FakeState {
            behavior: Arc::new(behavior),
            seen: seen.clone(),
        };
        let app = Router::new()
            .route("/token", post(token))
            .route("/popular", get(popular))
            .route("/news", get(news))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake upstream");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve fake upstream");
        });
        Self {
            base: format!("http://{addr}"),
            seen,
        }
    }

    /// Gateway config pointing at this fake, plus any overrides.
    pub fn config(&self, extra: &[(&str, &str)]) -> GatewayConfig {
        let mut m: HashMap<String, String> = HashMap::from([
            (ENV_CLIENT_ID.to_string(), "client-id".to_string()),
            (ENV_CLIENT_SECRET.to_string(), CLIENT_SECRET.to_string()),
            (ENV_USERNAME.to_string(), "svc-user".to_string()),
            (ENV_PASSWORD.to_string(), PASSWORD.to_string()),
            (ENV_NEWS_API_KEY.to_string(), API_KEY.to_string()),
            (ENV_USER_AGENT.to_string(), USER_AGENT.to_string()),
            (ENV_TIMEOUT_SECS.to_string(), "2".to_string()),
            (ENV_TOKEN_URL.to_string(), format!("{}/token", self.base)),
            (ENV_POPULAR_URL.to_string(), format!("{}/popular", self.base)),
            (ENV_TOP_STORIES_URL.to_string(), format!("{}/news", self.base)),
        ]);
        for (k, v) in extra {
            m.insert(k.to_string(), v.to_string());
        }
        GatewayConfig::from_lookup(|k| m.get(k).cloned()).expect("test config")
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn reply(r: &Reply) -> (StatusCode, Json<Value>) {
    if let Some(d) = r.delay {
        tokio::time::sleep(d).await;
    }
    (
        StatusCode::from_u16(r.status).expect("status"),
        Json(r.body.clone()),
    )
}

async fn token(
    State(s): State<FakeState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    s.seen.token_hits.fetch_add(1, Ordering::SeqCst);
    s.seen.note_agent(&headers);
    *s.seen.token_auth.lock().unwrap() = header(&headers, "authorization");
    *s.seen.token_form.lock().unwrap() = Some(body);
    reply(&s.behavior.token).await
}

async fn popular(State(s): State<FakeState>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    s.seen.popular_hits.fetch_add(1, Ordering::SeqCst);
    s.seen.note_agent(&headers);
    *s.seen.popular_auth.lock().unwrap() = header(&headers, "authorization");
    reply(&s.behavior.popular).await
}

async fn news(
    State(s): State<FakeState>,
    headers: HeaderMap,
    RawQuery(q): RawQuery,
) -> (StatusCode, Json<Value>) {
    s.seen.news_hits.fetch_add(1, Ordering::SeqCst);
    s.seen.note_agent(&headers);
    *s.seen.news_query.lock().unwrap() = q;
    reply(&s.behavior.news).await
}

/// Listing page shaped like the social provider's popular endpoint.
pub fn social_listing(n: usize) -> Value {
    let children: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "kind": "t3",
                "data": {
                    "name": format!("t3_{i}"),
                    "title": format!("post {i}"),
                    "author": format!("user{i}"),
                    "subreddit": "pics",
                    "permalink": format!("/r/pics/comments/{i}/"),
                    "score": 100 + i,
                    "num_comments": i,
                    "created_utc": 1714550400.0,
                    "preview": { "images": [
                        { "source": { "url": format!("https://preview.test/{i}.jpg?a=1&amp;b=2") } }
                    ] }
                }
            })
        })
        .collect();
    json!({ "kind": "Listing", "data": { "after": null, "children": children } })
}

/// Top-stories payload shaped like the news provider's endpoint.
pub fn news_payload(n: usize) -> Value {
    let results: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "uri": format!("nyt://article/{i}"),
                "title": format!("story {i}"),
                "abstract": format!("abstract {i}"),
                "url": format!("https://news.test/{i}"),
                "byline": "By Someone",
                "published_date": "2024-05-01T05:00:09-04:00",
                "multimedia": [ { "url": format!("https://img.news.test/{i}.jpg") } ]
            })
        })
        .collect();
    json!({ "status": "OK", "num_results": n, "results": results })
}
