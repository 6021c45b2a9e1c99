// src/ingest/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which upstream a collection was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    News,
    Social,
}

impl SourceId {
    pub const ALL: [SourceId; 2] = [SourceId::News, SourceId::Social];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceId::News => "news",
            SourceId::Social => "social",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engagement numbers; only the social feed carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetrics {
    pub score: i64,
    pub comments: u64,
}

/// Provider-agnostic item the navigator renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub source_url: String,
    pub author_or_source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub metrics: Option<ItemMetrics>,
}

/// Image reference as the renderer should see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemImage<'a> {
    Available(&'a str),
    NoImage,
}

impl ContentItem {
    /// Never yields an empty reference.
    pub fn image(&self) -> ItemImage<'_> {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => ItemImage::Available(url),
            _ => ItemImage::NoImage,
        }
    }
}

/// Ordered, per-session list of items from one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    source: SourceId,
    items: Vec<ContentItem>,
}

impl Collection {
    pub fn new(source: SourceId, items: Vec<ContentItem>) -> Self {
        Self { source, items }
    }

    pub fn empty(source: SourceId) -> Self {
        Self::new(source, Vec::new())
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&ContentItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
