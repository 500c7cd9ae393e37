//! Public handle for the relay connection.

use std::sync::Arc;

use cursorcast_common::ClientMessage;
use tokio::sync::{mpsc, RwLock};

use super::connection::connection_loop;
use super::types::{ChannelCommand, ChannelConfig, ChannelEvent};

/// Handle for the relay connection.
///
/// All methods are non-blocking and send commands to the background
/// connection task.
pub struct ChannelClient {
    command_tx: mpsc::Sender<ChannelCommand>,
    connected: Arc<RwLock<bool>>,
}

impl ChannelClient {
    /// Create a new client and start the background connection.
    /// Returns `(client, event_receiver)`.
    pub fn connect(config: ChannelConfig) -> (Self, mpsc::Receiver<ChannelEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(64);
        let connected = Arc::new(RwLock::new(false));

        let client = Self {
            command_tx,
            connected: Arc::clone(&connected),
        };

        tokio::spawn(connection_loop(config, connected, event_tx, command_rx));

        (client, event_rx)
    }

    /// Clone the command sender to create a lightweight handle
    /// that talks to the same connection.
    pub fn clone_sender(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            connected: Arc::clone(&self.connected),
        }
    }

    /// Queue a frame for the relay. Dropped silently while disconnected.
    pub async fn send(&self, message: ClientMessage) {
        let _ = self.command_tx.send(ChannelCommand::Send(message)).await;
    }

    /// Check if connected.
    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    /// Close the connection and stop the background loop.
    pub async fn disconnect(&self) {
        let _ = self.command_tx.send(ChannelCommand::Disconnect).await;
    }

    /// Build a handle whose commands land in the returned receiver instead
    /// of a live connection.
    #[cfg(test)]
    pub(crate) fn test_pair() -> (Self, mpsc::Receiver<ChannelCommand>) {
        let (command_tx, command_rx) = mpsc::channel(64);
        let client = Self {
            command_tx,
            connected: Arc::new(RwLock::new(true)),
        };
        (client, command_rx)
    }
}
