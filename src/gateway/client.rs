// src/gateway/client.rs
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::gateway::error::{body_value, ErrorEnvelope, GatewayError, Result, Upstream};
use crate::gateway::FeedGateway;
use crate::ingest::providers::news::RawNewsList;
use crate::ingest::providers::social::RawSocialList;

/// Consumes a running gateway's HTTP surface (`/api/news`, `/api/popular`).
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str, upstream: Upstream) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(upstream, e))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<Value>()
                .await
                .map_err(|e| GatewayError::from_reqwest(upstream, e));
        }

        let text = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(env) => Err(GatewayError::upstream_fetch(
                upstream,
                Some(status.as_u16()),
                Some(env.error),
                env.message,
            )),
            Err(_) => Err(GatewayError::upstream_fetch(
                upstream,
                Some(status.as_u16()),
                body_value(text),
                format!("gateway returned HTTP {}", status.as_u16()),
            )),
        }
    }
}

#[async_trait]
impl FeedGateway for GatewayClient {
    async fn fetch_social_feed(&self) -> Result<RawSocialList> {
        self.get("/api/popular", Upstream::SocialFeed)
            .await
            .map(RawSocialList)
    }

    async fn fetch_news_feed(&self) -> Result<RawNewsList> {
        self.get("/api/news", Upstream::NewsFeed).await.map(RawNewsList)
    }
}
