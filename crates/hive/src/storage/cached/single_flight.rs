//! Request coalescing (single-flight) for cache refreshes.
//!
//! The first caller for a key becomes the leader and runs the refresh;
//! callers arriving while it is in flight join it and receive a clone of
//! the leader's result instead of running their own. The result travels
//! over a `watch` channel, so joiners never depend on the cache to learn it.
//!
//! A leader that is dropped before finishing (cancelled request) releases
//! the key; its joiners then race to lead a new flight.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

type FlightMap<V> = Arc<Mutex<HashMap<String, watch::Receiver<Option<V>>>>>;

enum Role<V> {
    Leader(LeaderGuard<V>),
    Joiner(watch::Receiver<Option<V>>),
}

/// In-flight refreshes keyed by cache key, each sharing a result of type `V`.
#[derive(Debug)]
pub struct SingleFlight<V> {
    flights: FlightMap<V>,
}

impl<V> Default for SingleFlight<V> {
    fn default() -> Self {
        Self {
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<V> SingleFlight<V>
where
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `work` for `key` unless a flight for it is already running, in
    /// which case that flight's result is returned.
    pub async fn run<F, Fut>(&self, key: &str, work: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        loop {
            match self.join_or_lead(key) {
                Role::Leader(leader) => {
                    let value = work().await;
                    leader.complete(value.clone());
                    return value;
                }
                Role::Joiner(mut receiver) => {
                    tracing::trace!(key = %key, "Joining in-flight refresh");
                    let shared = receiver
                        .wait_for(Option::is_some)
                        .await
                        .ok()
                        .and_then(|value| (*value).clone());
                    if let Some(value) = shared {
                        return value;
                    }
                    tracing::debug!(key = %key, "In-flight refresh abandoned");
                }
            }
        }
    }

    fn join_or_lead(&self, key: &str) -> Role<V> {
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(receiver) = flights.get(key) {
            return Role::Joiner(receiver.clone());
        }

        let (sender, receiver) = watch::channel(None);
        flights.insert(key.to_string(), receiver.clone());

        Role::Leader(LeaderGuard {
            key: key.to_string(),
            flights: self.flights.clone(),
            sender,
            receiver,
        })
    }

    /// Number of keys with a flight in progress.
    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.flights
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Ownership of one flight; unregisters the key on drop.
struct LeaderGuard<V> {
    key: String,
    flights: FlightMap<V>,
    sender: watch::Sender<Option<V>>,
    receiver: watch::Receiver<Option<V>>,
}

impl<V> LeaderGuard<V> {
    fn complete(self, value: V) {
        self.sender.send_replace(Some(value));
    }
}

impl<V> Drop for LeaderGuard<V> {
    fn drop(&mut self) {
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);

        // A later flight may already own the key.
        let owned = flights
            .get(&self.key)
            .is_some_and(|receiver| receiver.same_channel(&self.receiver));
        if owned {
            flights.remove(&self.key);
        }
    }
}
