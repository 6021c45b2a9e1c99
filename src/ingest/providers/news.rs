// src/ingest/providers/news.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ingest::types::ContentItem;
use crate::ingest::{clean_text, lenient_list, sanitize_image_url};

/// Top-stories payload exactly as the upstream returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawNewsList(pub Value);

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Story {
    uri: Option<String>,
    title: Option<String>,
    #[serde(rename = "abstract")]
    summary: Option<String>,
    url: Option<String>,
    byline: Option<String>,
    section: Option<String>,
    published_date: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    multimedia: Vec<Multimedia>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Multimedia {
    url: Option<String>,
}

impl RawNewsList {
    /// Story entries under `results`; anything else yields an empty slice.
    fn stories(&self) -> &[Value] {
        self.0
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Map every well-formed story. Malformed entries are skipped and logged.
pub fn map_news(raw: &RawNewsList) -> Vec<ContentItem> {
    let stories = raw.stories();
    let mut out = Vec::with_capacity(stories.len());
    for (index, v) in stories.iter().enumerate() {
        match Story::deserialize(v) {
            Ok(story) => out.push(story_to_item(index, story)),
            Err(e) => {
                tracing::warn!(target: "ingest", provider = "news", index, error = %e, "skipping malformed story");
            }
        }
    }
    out
}

fn story_to_item(index: usize, s: Story) -> ContentItem {
    let source_url = s.url.clone().unwrap_or_default();
    let id = s
        .uri
        .filter(|u| !u.is_empty())
        .or_else(|| s.url.filter(|u| !u.is_empty()))
        .unwrap_or_else(|| format!("news-{index}"));

    let author_or_source = s
        .byline
        .as_deref()
        .map(clean_text)
        .filter(|b| !b.is_empty())
        .or_else(|| s.section.as_deref().map(clean_text).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| "news".to_string());

    let image_url = s
        .multimedia
        .into_iter()
        .find_map(|m| m.url.as_deref().and_then(sanitize_image_url));

    ContentItem {
        id,
        title: s.title.as_deref().map(clean_text).unwrap_or_default(),
        body: s.summary.as_deref().map(clean_text).unwrap_or_default(),
        image_url,
        source_url,
        author_or_source,
        published_at: s.published_date.as_deref().and_then(parse_published),
        metrics: None,
    }
}

fn parse_published(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
