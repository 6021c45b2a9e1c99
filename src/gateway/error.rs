// src/gateway/error.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Which upstream call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upstream {
    TokenExchange,
    SocialFeed,
    NewsFeed,
}

impl Upstream {
    pub fn as_str(self) -> &'static str {
        match self {
            Upstream::TokenExchange => "token_exchange",
            Upstream::SocialFeed => "social_feed",
            Upstream::NewsFeed => "news_feed",
        }
    }

    /// Human-facing provider name used in the error envelope.
    pub fn provider(self) -> &'static str {
        match self {
            Upstream::TokenExchange | Upstream::SocialFeed => "social",
            Upstream::NewsFeed => "news",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Token exchange failed; the feed was never requested.
    Credential,
    /// Feed endpoint answered, but not with a usable success.
    UpstreamFetch,
    /// Network failure or timeout on a feed call.
    Transport,
}

#[derive(Debug, Clone, Error)]
#[error("{kind:?} error from {upstream}{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
pub struct GatewayError {
    pub kind: ErrorKind,
    pub upstream: Upstream,
    pub status: Option<u16>,
    pub body: Option<Value>,
    pub message: String,
}

impl GatewayError {
    pub fn credential(status: Option<u16>, body: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Credential,
            upstream: Upstream::TokenExchange,
            status,
            body,
            message: message.into(),
        }
    }

    pub fn upstream_fetch(
        upstream: Upstream,
        status: Option<u16>,
        body: Option<Value>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::UpstreamFetch,
            upstream,
            status,
            body,
            message: message.into(),
        }
    }

    pub fn transport(upstream: Upstream, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            upstream,
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// Classify a reqwest failure. The URL is stripped because the news
    /// endpoint carries its API key in the query string.
    pub fn from_reqwest(upstream: Upstream, err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let is_decode = err.is_decode();
        let message = if err.is_timeout() {
            "timed out".to_string()
        } else {
            err.without_url().to_string()
        };
        match upstream {
            Upstream::TokenExchange => Self::credential(status, None, message),
            _ if is_decode => Self::upstream_fetch(upstream, status, None, message),
            _ => Self::transport(upstream, message),
        }
    }

    /// Wire envelope for this error.
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            message: format!("Error accessing {} API", self.upstream.provider()),
            error: self
                .body
                .clone()
                .unwrap_or_else(|| Value::String(self.message.clone())),
        }
    }
}

/// Parse an upstream error body as JSON when possible; keep raw text otherwise.
pub fn body_value(text: String) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// The only error shape the gateway puts on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: String,
    pub error: Value,
}
