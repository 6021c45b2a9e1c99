// src/ingest/mod.rs
//! Ingestion boundary: raw upstream payloads in, normalized collections out.
//!
//! Each provider keeps its own raw shape; the only place that knows about
//! both is [`RawFeed`], and the only way out of it is [`into_collection`].

pub mod providers;
pub mod types;

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::providers::news::{map_news, RawNewsList};
use crate::ingest::providers::social::{map_social, RawSocialList};
use crate::ingest::types::{Collection, SourceId};

/// How many ranked social posts a session keeps.
pub const DEFAULT_SOCIAL_LIMIT: usize = 15;

/// Upstream payload tagged with the provider it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFeed {
    News(RawNewsList),
    Social(RawSocialList),
}

impl RawFeed {
    pub fn source(&self) -> SourceId {
        match self {
            RawFeed::News(_) => SourceId::News,
            RawFeed::Social(_) => SourceId::Social,
        }
    }
}

/// Total mapping from a tagged payload to a collection. Never fails; a
/// payload with nothing usable produces an empty collection.
pub fn into_collection(feed: &RawFeed, social_limit: usize) -> Collection {
    let items = match feed {
        RawFeed::News(raw) => map_news(raw),
        RawFeed::Social(raw) => map_social(raw, social_limit),
    };
    tracing::debug!(target: "ingest", source = %feed.source(), items = items.len(), "mapped feed");
    Collection::new(feed.source(), items)
}

/// Decode entity escaping in an image reference. Blank input means no image.
pub fn sanitize_image_url(raw: &str) -> Option<String> {
    let decoded = html_escape::decode_html_entities(raw.trim());
    let out = decoded.trim();
    if out.is_empty() {
        None
    } else {
        Some(out.to_string())
    }
}

/// Field decoder for optional nested lists: anything that is not an array
/// becomes empty, and entries that fail to decode are dropped.
pub(crate) fn lenient_list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|v| T::deserialize(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Field decoder for optional nested objects: a value of the wrong shape is `None`.
pub(crate) fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(T::deserialize(value).ok())
}

/// Entity-decode and trim display text.
pub fn clean_text(s: &str) -> String {
    html_escape::decode_html_entities(s).trim().to_string()
}
