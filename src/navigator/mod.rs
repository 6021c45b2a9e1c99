// src/navigator/mod.rs
//! # Carousel Navigator
//! Single owner of `(active source, current index)` across the two
//! collections.
//!
//! All input channels go through [`Navigator::dispatch`], which only calls
//! [`Navigator::next`], [`Navigator::previous`] or [`Navigator::select_source`].
//! Those three are the only writers of [`NavigatorState`]. Switching source
//! always resets the index to 0, so an index that happens to be valid in the
//! other collection never points at an unrelated item.

pub mod input;
pub mod loader;
pub mod session;

use crate::ingest::types::{Collection, ContentItem, SourceId};
use input::{InputEvent, Intent};

/// Position in the active collection. Only meaningful while that collection
/// is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorState {
    active_source: SourceId,
    current_index: usize,
}

impl NavigatorState {
    pub fn active_source(&self) -> SourceId {
        self.active_source
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }
}

impl Default for NavigatorState {
    fn default() -> Self {
        Self {
            active_source: SourceId::News,
            current_index: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Loading,
    Unavailable(String),
    Loaded(Collection),
}

/// What a tab should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability<'a> {
    Loading,
    Unavailable(&'a str),
    Ready(usize),
}

/// Result of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(usize),
    /// Active collection has no items; state is unchanged.
    Empty,
}

/// Derived view of the active collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrentItem<'a> {
    Ready {
        item: &'a ContentItem,
        index: usize,
        len: usize,
    },
    NotReady,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    state: NavigatorState,
    news: Slot,
    social: Slot,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Starts on the news tab at index 0 with both collections loading.
    pub fn new() -> Self {
        Self {
            state: NavigatorState::default(),
            news: Slot::Loading,
            social: Slot::Loading,
        }
    }

    pub fn state(&self) -> NavigatorState {
        self.state
    }

    pub fn next(&mut self) -> Step {
        match self.active_len() {
            0 => Step::Empty,
            len => {
                self.state.current_index = (self.state.current_index + 1) % len;
                Step::Moved(self.state.current_index)
            }
        }
    }

    pub fn previous(&mut self) -> Step {
        match self.active_len() {
            0 => Step::Empty,
            len => {
                self.state.current_index = (self.state.current_index + len - 1) % len;
                Step::Moved(self.state.current_index)
            }
        }
    }

    /// Switch tabs. The index always resets to 0, even when re-selecting the
    /// active source.
    pub fn select_source(&mut self, source: SourceId) {
        if self.state.active_source != source {
            tracing::debug!(target: "navigator", from = %self.state.active_source, to = %source, "switching source");
        }
        self.state.active_source = source;
        self.state.current_index = 0;
    }

    /// Single entry point for keyboard, swipe, click and tab events.
    pub fn dispatch(&mut self, event: InputEvent) -> Step {
        match event.intent() {
            Intent::Forward => self.next(),
            Intent::Backward => self.previous(),
            Intent::Select(source) => {
                self.select_source(source);
                if self.active_len() == 0 {
                    Step::Empty
                } else {
                    Step::Moved(0)
                }
            }
        }
    }

    /// Pure read of the active collection at the current index.
    pub fn current_item(&self) -> CurrentItem<'_> {
        let Some(collection) = self.loaded(self.state.active_source) else {
            return CurrentItem::NotReady;
        };
        match collection.get(self.state.current_index) {
            Some(item) => CurrentItem::Ready {
                item,
                index: self.state.current_index,
                len: collection.len(),
            },
            None => CurrentItem::NotReady,
        }
    }

    /// `(index, len)` for slide indicators; `None` while not ready.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self.current_item() {
            CurrentItem::Ready { index, len, .. } => Some((index, len)),
            CurrentItem::NotReady => None,
        }
    }

    pub fn availability(&self, source: SourceId) -> Availability<'_> {
        match self.slot(source) {
            Slot::Loading => Availability::Loading,
            Slot::Unavailable(reason) => Availability::Unavailable(reason),
            Slot::Loaded(c) => Availability::Ready(c.len()),
        }
    }

    /// Install a loaded collection. Replacing the active one resets the index.
    pub(crate) fn set_collection(&mut self, collection: Collection) {
        let source = collection.source();
        *self.slot_mut(source) = Slot::Loaded(collection);
        if source == self.state.active_source {
            self.state.current_index = 0;
        }
    }

    pub(crate) fn mark_unavailable(&mut self, source: SourceId, reason: impl Into<String>) {
        *self.slot_mut(source) = Slot::Unavailable(reason.into());
    }

    pub(crate) fn is_loaded(&self, source: SourceId) -> bool {
        self.loaded(source).is_some()
    }

    fn active_len(&self) -> usize {
        self.loaded(self.state.active_source).map_or(0, Collection::len)
    }

    fn loaded(&self, source: SourceId) -> Option<&Collection> {
        match self.slot(source) {
            Slot::Loaded(c) => Some(c),
            _ => None,
        }
    }

    fn slot(&self, source: SourceId) -> &Slot {
        match source {
            SourceId::News => &self.news,
            SourceId::Social => &self.social,
        }
    }

    fn slot_mut(&mut self, source: SourceId) -> &mut Slot {
        match source {
            SourceId::News => &mut self.news,
            SourceId::Social => &mut self.social,
        }
    }
}
