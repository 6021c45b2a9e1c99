// src/gateway/mod.rs
//! Aggregation gateway: owns the upstream credential lifecycle and the two
//! upstream fetches. Each fetch is all-or-nothing and returns the upstream
//! payload untouched; reshaping happens at the ingest boundary.

pub mod client;
pub mod credential;
pub mod error;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::config::GatewayConfig;
use crate::ingest::providers::news::RawNewsList;
use crate::ingest::providers::social::RawSocialList;
use crate::ingest::types::SourceId;
use crate::ingest::RawFeed;
use crate::metrics::record_upstream;

pub use client::GatewayClient;
pub use credential::{CredentialCache, UpstreamCredential};
pub use error::{ErrorEnvelope, ErrorKind, GatewayError, Result, Upstream};

const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(4);

/// Read-only access to the two feeds.
#[async_trait]
pub trait FeedGateway: Send + Sync {
    async fn fetch_social_feed(&self) -> Result<RawSocialList>;
    async fn fetch_news_feed(&self) -> Result<RawNewsList>;

    /// Fetch one feed, tagged with its source.
    async fn fetch(&self, source: SourceId) -> Result<RawFeed> {
        match source {
            SourceId::News => self.fetch_news_feed().await.map(RawFeed::News),
            SourceId::Social => self.fetch_social_feed().await.map(RawFeed::Social),
        }
    }
}

/// Talks to the upstream providers directly.
pub struct HttpGateway {
    http: reqwest::Client,
    cfg: GatewayConfig,
    credentials: CredentialCache,
}

impl HttpGateway {
    pub fn new(cfg: GatewayConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .connect_timeout(cfg.timeout.min(MAX_CONNECT_TIMEOUT))
            .timeout(cfg.timeout)
            .build()?;
        let credentials = CredentialCache::new(cfg.cache_credentials);
        Ok(Self {
            http,
            cfg,
            credentials,
        })
    }

    async fn credential(&self) -> Result<UpstreamCredential> {
        if let Some(cred) = self.credentials.get_fresh(Utc::now()) {
            tracing::debug!(target: "gateway", obtained_at = %cred.obtained_at(), "reusing cached credential");
            return Ok(cred);
        }
        let started = Instant::now();
        let res = credential::exchange(&self.http, &self.cfg).await;
        observe(Upstream::TokenExchange, started, &res);
        let cred = res?;
        self.credentials.store(&cred);
        Ok(cred)
    }

    async fn get_popular(&self, cred: &UpstreamCredential) -> Result<Value> {
        tracing::info!(target: "gateway", upstream = %Upstream::SocialFeed, "fetching popular items");
        let resp = self
            .http
            .get(&self.cfg.urls.popular)
            .bearer_auth(cred.token().expose_secret())
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(Upstream::SocialFeed, e))?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            self.credentials.invalidate();
        }
        read_json(Upstream::SocialFeed, resp).await
    }

    async fn get_top_stories(&self) -> Result<Value> {
        tracing::info!(target: "gateway", upstream = %Upstream::NewsFeed, "fetching top stories");
        let resp = self
            .http
            .get(&self.cfg.urls.top_stories)
            .query(&[("api-key", self.cfg.news_api_key.expose_secret())])
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(Upstream::NewsFeed, e))?;
        read_json(Upstream::NewsFeed, resp).await
    }
}

#[async_trait]
impl FeedGateway for HttpGateway {
    async fn fetch_social_feed(&self) -> Result<RawSocialList> {
        // The feed request is only built once the exchange has resolved.
        let cred = self.credential().await?;
        let started = Instant::now();
        let res = self.get_popular(&cred).await;
        observe(Upstream::SocialFeed, started, &res);
        res.map(RawSocialList)
    }

    async fn fetch_news_feed(&self) -> Result<RawNewsList> {
        let started = Instant::now();
        let res = self.get_top_stories().await;
        observe(Upstream::NewsFeed, started, &res);
        res.map(RawNewsList)
    }
}

/// Non-2xx becomes `UpstreamFetch` carrying status and body.
async fn read_json(upstream: Upstream, resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.ok().and_then(error::body_value);
        return Err(GatewayError::upstream_fetch(
            upstream,
            Some(status.as_u16()),
            body,
            format!("upstream returned HTTP {}", status.as_u16()),
        ));
    }
    resp.json::<Value>()
        .await
        .map_err(|e| GatewayError::from_reqwest(upstream, e))
}

/// Log the outcome of one upstream call and record it.
fn observe<T>(upstream: Upstream, started: Instant, res: &Result<T>) {
    let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;
    match res {
        Ok(_) => {
            tracing::info!(target: "gateway", %upstream, elapsed_ms, "upstream call succeeded");
            record_upstream(upstream.as_str(), "ok", elapsed_ms);
        }
        Err(e) => {
            tracing::warn!(
                target: "gateway",
                %upstream,
                kind = ?e.kind,
                status = ?e.status,
                body = ?e.body,
                error = %e.message,
                elapsed_ms,
                "upstream call failed"
            );
            let outcome = match e.kind {
                ErrorKind::Credential => "credential_error",
                ErrorKind::UpstreamFetch => "upstream_error",
                ErrorKind::Transport => "transport_error",
            };
            record_upstream(upstream.as_str(), outcome, elapsed_ms);
        }
    }
}
