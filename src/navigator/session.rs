// src/navigator/session.rs
//! Client session: the navigator plus bookkeeping for in-flight fetches.
//!
//! Each fetch is issued a ticket with a session-wide increasing sequence
//! number. A result is applied only if its ticket is the most recently
//! issued one for that source and the session is still open, so a slow
//! older request can never overwrite state from a newer one.

use crate::gateway::GatewayError;
use crate::ingest::types::{Collection, SourceId};
use crate::navigator::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    source: SourceId,
    seq: u64,
}

impl FetchTicket {
    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What happened to a delivered fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    /// A newer fetch for the same source was issued after this one.
    Stale,
    /// The session was torn down before the result arrived.
    Closed,
}

#[derive(Debug, Default)]
pub struct Session {
    navigator: Navigator,
    last_seq: u64,
    latest_news: Option<u64>,
    latest_social: Option<u64>,
    closed: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Input handlers get the navigator; they still only reach its entry points.
    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn begin_fetch(&mut self, source: SourceId) -> FetchTicket {
        self.last_seq += 1;
        *self.latest_mut(source) = Some(self.last_seq);
        FetchTicket {
            source,
            seq: self.last_seq,
        }
    }

    pub fn deliver(
        &mut self,
        ticket: FetchTicket,
        result: Result<Collection, GatewayError>,
    ) -> Delivery {
        if self.closed {
            tracing::debug!(target: "navigator", source = %ticket.source, seq = ticket.seq, "discarding result for closed session");
            return Delivery::Closed;
        }
        if self.latest(ticket.source) != Some(ticket.seq) {
            tracing::debug!(target: "navigator", source = %ticket.source, seq = ticket.seq, "discarding stale result");
            return Delivery::Stale;
        }

        match result {
            Ok(collection) if collection.source() == ticket.source => {
                tracing::info!(target: "navigator", source = %ticket.source, items = collection.len(), "collection loaded");
                self.navigator.set_collection(collection);
            }
            Ok(collection) => {
                tracing::warn!(
                    target: "navigator",
                    expected = %ticket.source,
                    got = %collection.source(),
                    "collection delivered under the wrong ticket"
                );
                return Delivery::Stale;
            }
            Err(e) => {
                tracing::warn!(target: "navigator", source = %ticket.source, error = %e, "collection failed to load");
                // Keep already-displayed data if a refresh fails.
                if !self.navigator.is_loaded(ticket.source) {
                    self.navigator
                        .mark_unavailable(ticket.source, e.envelope().message);
                }
            }
        }
        Delivery::Applied
    }

    /// Teardown. Anything still in flight is discarded on arrival.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn latest(&self, source: SourceId) -> Option<u64> {
        match source {
            SourceId::News => self.latest_news,
            SourceId::Social => self.latest_social,
        }
    }

    fn latest_mut(&mut self, source: SourceId) -> &mut Option<u64> {
        match source {
            SourceId::News => &mut self.latest_news,
            SourceId::Social => &mut self.latest_social,
        }
    }
}
