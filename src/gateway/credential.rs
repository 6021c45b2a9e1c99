// src/gateway/credential.rs
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Mutex;

use crate::config::GatewayConfig;
use crate::gateway::error::{body_value, GatewayError, Result, Upstream};

/// Reuse stops this long before the upstream-declared expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Bearer token for the social feed. Never serialized, never logged.
#[derive(Debug, Clone)]
pub struct UpstreamCredential {
    token: SecretString,
    obtained_at: DateTime<Utc>,
    expires_in: Option<Duration>,
}

impl UpstreamCredential {
    pub fn new(token: SecretString, obtained_at: DateTime<Utc>, expires_in: Option<Duration>) -> Self {
        Self {
            token,
            obtained_at,
            expires_in,
        }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }

    /// Without a declared lifetime a credential is never considered reusable.
    /// An expiry that does not fit in a timestamp counts as unknown.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_in
            .and_then(|ttl| self.obtained_at.checked_add_signed(ttl))
            .and_then(|expiry| expiry.checked_sub_signed(Duration::seconds(EXPIRY_MARGIN_SECS)))
            .is_some_and(|usable_until| now < usable_until)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

/// Password-grant exchange against the token endpoint.
pub async fn exchange(http: &reqwest::Client, cfg: &GatewayConfig) -> Result<UpstreamCredential> {
    tracing::info!(target: "gateway", upstream = %Upstream::TokenExchange, "exchanging service credentials");

    let form = [
        ("grant_type", "password"),
        ("username", cfg.username.as_str()),
        ("password", cfg.password.expose_secret()),
    ];
    let resp = http
        .post(&cfg.urls.token)
        .basic_auth(&cfg.client_id, Some(cfg.client_secret.expose_secret()))
        .form(&form)
        .send()
        .await
        .map_err(|e| GatewayError::from_reqwest(Upstream::TokenExchange, e))?;

    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| GatewayError::from_reqwest(Upstream::TokenExchange, e))?;

    if !status.is_success() {
        return Err(GatewayError::credential(
            Some(status.as_u16()),
            body_value(text),
            format!("token endpoint returned HTTP {}", status.as_u16()),
        ));
    }

    // Some providers answer 200 with an `error` object on a rejected grant.
    let parsed: Option<TokenResponse> = serde_json::from_str(&text).ok();
    match parsed.and_then(|t| t.access_token.filter(|s| !s.is_empty()).map(|tok| (tok, t.expires_in))) {
        Some((token, expires_in)) => Ok(UpstreamCredential::new(
            SecretString::new(token.into_boxed_str()),
            Utc::now(),
            lifetime(expires_in),
        )),
        None => Err(GatewayError::credential(
            Some(status.as_u16()),
            body_value(text),
            "token endpoint returned no access token",
        )),
    }
}

/// Declared lifetime in seconds; non-positive or out-of-range values are dropped.
fn lifetime(expires_in: Option<i64>) -> Option<Duration> {
    expires_in.filter(|s| *s > 0).and_then(Duration::try_seconds)
}

/// Holds at most one credential. Disabled caches never store anything.
#[derive(Debug)]
pub struct CredentialCache {
    enabled: bool,
    slot: Mutex<Option<UpstreamCredential>>,
}

impl CredentialCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            slot: Mutex::new(None),
        }
    }

    pub fn get_fresh(&self, now: DateTime<Utc>) -> Option<UpstreamCredential> {
        if !self.enabled {
            return None;
        }
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().filter(|c| c.is_fresh_at(now)).cloned()
    }

    pub fn store(&self, cred: &UpstreamCredential) {
        if !self.enabled {
            return;
        }
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(cred.clone());
    }

    pub fn invalidate(&self) {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
    }
}
