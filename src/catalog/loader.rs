//! Background catalog requests with stale-response suppression.
//!
//! Each request is tagged with a token from a monotonically increasing
//! counter. Only the outcome carrying the latest token is delivered; anything
//! older arrives too late to matter and is dropped.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::client::CatalogClient;
use super::error::FetchError;
use super::model::{CatalogQuery, Track};

/// A completed catalog request.
#[derive(Debug)]
pub struct LoadOutcome {
    pub token: u64,
    pub query: CatalogQuery,
    pub result: Result<Vec<Track>, FetchError>,
}

pub struct CatalogLoader {
    client: CatalogClient,
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
    latest: u64,
    resolved: u64,
}

impl CatalogLoader {
    pub fn new(client: CatalogClient) -> Self {
        let (tx, rx) = mpsc::channel::<LoadOutcome>();
        Self {
            client,
            tx,
            rx,
            latest: 0,
            resolved: 0,
        }
    }

    /// Issue `query` on a worker thread. Returns the request token.
    pub fn request(&mut self, query: CatalogQuery) -> u64 {
        let token = self.next_token();
        let client = self.client.clone();
        let tx = self.tx.clone();

        tracing::info!(token, ?query, "catalog request issued");
        thread::spawn(move || {
            let result = client.fetch(&query);
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(LoadOutcome {
                token,
                query,
                result,
            });
        });

        token
    }

    /// Return the newest current outcome, if one has arrived.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        let mut delivered = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(current) = self.admit(outcome) {
                delivered = Some(current);
            }
        }
        delivered
    }

    /// True while the most recently issued request has not resolved.
    pub fn is_loading(&self) -> bool {
        self.resolved < self.latest
    }

    pub(super) fn next_token(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Keep `outcome` only if it answers the latest request.
    pub(super) fn admit(&mut self, outcome: LoadOutcome) -> Option<LoadOutcome> {
        if outcome.token != self.latest {
            tracing::debug!(
                token = outcome.token,
                latest = self.latest,
                "discarding stale catalog response"
            );
            return None;
        }
        self.resolved = outcome.token;
        Some(outcome)
    }
}
