//! "Last request wins" coordination for overlapping fetches.
//!
//! Starting a new request cancels whichever one is still in flight. The
//! cancelled call returns [`Outcome::Superseded`] right away and its future
//! (including any open HTTP request) is dropped. A result that arrives after
//! its request was superseded is discarded the same way.

use parking_lot::Mutex;
use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Superseded,
}

impl<T> Outcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Superseded => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct LatestOnly {
    generation: AtomicU64,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl LatestOnly {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut slot = self.in_flight.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = slot.replace(token.clone()) {
            previous.cancel();
        }
        (generation, token)
    }

    /// Run `request`, superseding any earlier one still in flight.
    pub async fn run<F>(&self, request: F) -> Outcome<F::Output>
    where
        F: Future,
    {
        let (generation, token) = self.begin();

        let output = tokio::select! {
            _ = token.cancelled() => {
                debug!(generation, "request superseded while in flight");
                return Outcome::Superseded;
            }
            output = request => output,
        };

        let mut slot = self.in_flight.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding result of superseded request");
            return Outcome::Superseded;
        }
        slot.take();
        Outcome::Completed(output)
    }

    /// Abandon the in-flight request, if any, without starting another.
    pub fn cancel(&self) {
        let mut slot = self.in_flight.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = slot.take() {
            token.cancel();
        }
    }
}
