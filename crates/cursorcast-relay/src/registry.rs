//! Connection registry: the relay's only shared state.
//!
//! Maps each assigned user id to that connection's outbound channel. The map
//! is mutated only on connect and disconnect; broadcasts iterate a snapshot
//! taken under the read lock, so a disconnect landing mid-broadcast can never
//! hand us a sender that was removed out from under the iteration.

use std::collections::HashMap;
use std::sync::Arc;

use cursorcast_common::UserId;
use tokio::sync::{mpsc, RwLock};

/// Outbound frames for one connection. Bounded: a peer that stops draining
/// its socket loses frames instead of stalling the broadcast.
pub type OutboundSender = mpsc::Sender<String>;

/// Capacity of each connection's outbound queue.
pub const OUTBOUND_QUEUE: usize = 256;

/// Thread-safe set of active connections.
#[derive(Clone)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<UserId, OutboundSender>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a connection to the active set.
    pub async fn register(&self, user_id: UserId, tx: OutboundSender) {
        self.connections.write().await.insert(user_id, tx);
    }

    /// Remove a connection. Returns true if it was present.
    pub async fn unregister(&self, user_id: &UserId) -> bool {
        self.connections.write().await.remove(user_id).is_some()
    }

    /// Send `frame` to every registered connection except `sender`.
    ///
    /// Delivery is at-most-once with no retry: a recipient whose queue is
    /// full or closed loses this one frame, and the remaining recipients are
    /// unaffected. Returns the number of queued deliveries.
    pub async fn broadcast_except(&self, sender: &UserId, frame: &str) -> usize {
        let targets: Vec<(UserId, OutboundSender)> = {
            let map = self.connections.read().await;
            map.iter()
                .filter(|(id, _)| *id != sender)
                .map(|(id, tx)| (id.clone(), tx.clone()))
                .collect()
        };

        let mut delivered = 0;
        for (id, tx) in targets {
            match tx.try_send(frame.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::debug!(user = %id, error = %e, "Dropping frame for unwritable peer");
                }
            }
        }
        delivered
    }

    /// Number of active connections.
    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
