// src/navigator/loader.rs
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::gateway::{FeedGateway, GatewayError};
use crate::ingest::into_collection;
use crate::ingest::types::{Collection, SourceId};
use crate::navigator::session::{FetchTicket, Session};

/// Both loads, each with its own outcome.
#[derive(Debug)]
pub struct LoadedCollections {
    pub news: Result<Collection, GatewayError>,
    pub social: Result<Collection, GatewayError>,
}

/// A finished fetch, addressed to the ticket it was issued under.
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Collection, GatewayError>,
}

pub async fn fetch_collection(
    gateway: &dyn FeedGateway,
    source: SourceId,
    social_limit: usize,
) -> Result<Collection, GatewayError> {
    let raw = gateway.fetch(source).await?;
    Ok(into_collection(&raw, social_limit))
}

/// Run both loads concurrently; one failing never affects the other.
pub async fn load_collections(gateway: &dyn FeedGateway, social_limit: usize) -> LoadedCollections {
    let (news, social) = tokio::join!(
        fetch_collection(gateway, SourceId::News, social_limit),
        fetch_collection(gateway, SourceId::Social, social_limit),
    );
    LoadedCollections { news, social }
}

/// Issue a ticket per source and spawn the fetches. Results arrive on the
/// returned channel in completion order; hand each to [`Session::deliver`].
pub fn spawn_loads(
    gateway: Arc<dyn FeedGateway>,
    session: &mut Session,
    social_limit: usize,
) -> mpsc::Receiver<LoadOutcome> {
    let (tx, rx) = mpsc::channel(SourceId::ALL.len());
    for source in SourceId::ALL {
        let ticket = session.begin_fetch(source);
        let tx = tx.clone();
        let gateway = Arc::clone(&gateway);
        tokio::spawn(async move {
            let result = fetch_collection(gateway.as_ref(), source, social_limit).await;
            // Receiver gone means the session was torn down.
            let _ = tx.send(LoadOutcome { ticket, result }).await;
        });
    }
    rx
}
