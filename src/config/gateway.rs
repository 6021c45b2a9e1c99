// src/config/gateway.rs
use anyhow::{anyhow, bail, Context, Result};
use secrecy::SecretString;
use std::time::Duration;

pub const ENV_PORT: &str = "PORT";
pub const ENV_CLIENT_ID: &str = "SOCIAL_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SOCIAL_CLIENT_SECRET";
pub const ENV_USERNAME: &str = "SOCIAL_USERNAME";
pub const ENV_PASSWORD: &str = "SOCIAL_PASSWORD";
pub const ENV_NEWS_API_KEY: &str = "NEWS_API_KEY";
pub const ENV_USER_AGENT: &str = "UPSTREAM_USER_AGENT";
pub const ENV_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
pub const ENV_TOKEN_URL: &str = "SOCIAL_TOKEN_URL";
pub const ENV_POPULAR_URL: &str = "SOCIAL_POPULAR_URL";
pub const ENV_TOP_STORIES_URL: &str = "NEWS_TOP_STORIES_URL";
pub const ENV_TOKEN_CACHE: &str = "SOCIAL_TOKEN_CACHE";

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_USER_AGENT: &str = "feed-carousel/0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const DEFAULT_POPULAR_URL: &str = "https://oauth.reddit.com/r/popular";
pub const DEFAULT_TOP_STORIES_URL: &str = "https://api.nytimes.com/svc/topstories/v2/home.json";

/// Upstream endpoints. Overridable so tests can point at local fakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamUrls {
    pub token: String,
    pub popular: String,
    pub top_stories: String,
}

impl Default for UpstreamUrls {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN_URL.to_string(),
            popular: DEFAULT_POPULAR_URL.to_string(),
            top_stories: DEFAULT_TOP_STORIES_URL.to_string(),
        }
    }
}

/// Everything the gateway needs at boot. `Debug` redacts secrets.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub client_id: String,
    pub client_secret: SecretString,
    pub username: String,
    pub password: SecretString,
    pub news_api_key: SecretString,
    pub user_agent: String,
    pub timeout: Duration,
    pub urls: UpstreamUrls,
    pub cache_credentials: bool,
}

impl GatewayConfig {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup. All missing required keys are reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut missing = Vec::new();
        let mut required = |k: &'static str| {
            let v = get(k);
            if v.is_none() {
                missing.push(k);
            }
            v.unwrap_or_default()
        };
        let client_id = required(ENV_CLIENT_ID);
        let client_secret = required(ENV_CLIENT_SECRET);
        let username = required(ENV_USERNAME);
        let password = required(ENV_PASSWORD);
        let news_api_key = required(ENV_NEWS_API_KEY);
        if !missing.is_empty() {
            bail!("missing required configuration: {}", missing.join(", "));
        }

        let port = match get(ENV_PORT) {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("{ENV_PORT} must be a port number, got {p:?}"))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(s) => s
                .parse::<u64>()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be whole seconds, got {s:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(anyhow!("{ENV_TIMEOUT_SECS} must be greater than zero"));
        }

        let defaults = UpstreamUrls::default();
        let urls = UpstreamUrls {
            token: get(ENV_TOKEN_URL).unwrap_or(defaults.token),
            popular: get(ENV_POPULAR_URL).unwrap_or(defaults.popular),
            top_stories: get(ENV_TOP_STORIES_URL).unwrap_or(defaults.top_stories),
        };

        Ok(Self {
            port,
            client_id,
            client_secret: SecretString::new(client_secret.into_boxed_str()),
            username,
            password: SecretString::new(password.into_boxed_str()),
            news_api_key: SecretString::new(news_api_key.into_boxed_str()),
            user_agent: get(ENV_USER_AGENT).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            urls,
            cache_credentials: get(ENV_TOKEN_CACHE).is_some_and(|v| v == "1"),
        })
    }
}
