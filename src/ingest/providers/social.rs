// src/ingest/providers/social.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ingest::types::{ContentItem, ItemMetrics};
use crate::ingest::{clean_text, lenient, lenient_list, sanitize_image_url};

const PERMALINK_BASE: &str = "https://www.reddit.com";

/// Popular-items listing page exactly as the upstream returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSocialList(pub Value);

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Post {
    id: Option<String>,
    name: Option<String>,
    title: Option<String>,
    selftext: Option<String>,
    author: Option<String>,
    subreddit: Option<String>,
    permalink: Option<String>,
    url: Option<String>,
    score: Option<i64>,
    num_comments: Option<u64>,
    created_utc: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    preview: Option<Preview>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Preview {
    #[serde(deserialize_with = "lenient_list")]
    images: Vec<PreviewImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PreviewImage {
    #[serde(deserialize_with = "lenient")]
    source: Option<ImageSource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageSource {
    url: Option<String>,
}

impl RawSocialList {
    /// Ranked entries under `data.children`.
    fn children(&self) -> &[Value] {
        self.0
            .pointer("/data/children")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Map at most `limit` posts, in upstream rank order.
pub fn map_social(raw: &RawSocialList, limit: usize) -> Vec<ContentItem> {
    let children = raw.children();
    let mut out = Vec::with_capacity(children.len().min(limit));
    for (index, child) in children.iter().take(limit).enumerate() {
        let data = child.get("data").unwrap_or(&Value::Null);
        match Post::deserialize(data) {
            Ok(post) => out.push(post_to_item(index, post)),
            Err(e) => {
                tracing::warn!(target: "ingest", provider = "social", index, error = %e, "skipping malformed post");
            }
        }
    }
    out
}

fn post_to_item(index: usize, p: Post) -> ContentItem {
    let id = p
        .name
        .filter(|s| !s.is_empty())
        .or_else(|| p.id.filter(|s| !s.is_empty()))
        .unwrap_or_else(|| format!("social-{index}"));

    let source_url = match p.permalink.as_deref() {
        Some(path) if !path.is_empty() => format!("{PERMALINK_BASE}{path}"),
        _ => p.url.unwrap_or_default(),
    };

    let image_url = p.preview.and_then(|pv| {
        pv.images
            .into_iter()
            .find_map(|img| img.source.and_then(|s| s.url).as_deref().and_then(sanitize_image_url))
    });

    ContentItem {
        id,
        title: p.title.as_deref().map(clean_text).unwrap_or_default(),
        body: p.selftext.as_deref().map(clean_text).unwrap_or_default(),
        image_url,
        source_url,
        author_or_source: attribution(p.author.as_deref(), p.subreddit.as_deref()),
        published_at: p.created_utc.and_then(from_epoch_secs),
        metrics: Some(ItemMetrics {
            score: p.score.unwrap_or(0),
            comments: p.num_comments.unwrap_or(0),
        }),
    }
}

fn attribution(author: Option<&str>, community: Option<&str>) -> String {
    let author = author.filter(|s| !s.is_empty());
    let community = community.filter(|s| !s.is_empty());
    match (author, community) {
        (Some(a), Some(c)) => format!("u/{a} in r/{c}"),
        (Some(a), None) => format!("u/{a}"),
        (None, Some(c)) => format!("r/{c}"),
        (None, None) => "social".to_string(),
    }
}

fn from_epoch_secs(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp(secs.trunc() as i64, 0)
}
