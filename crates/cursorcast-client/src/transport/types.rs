//! Configuration and event/command enums for the transport channel.

use cursorcast_common::{ClientMessage, ServerMessage};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for connecting to the relay.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// WebSocket URL of the relay.
    pub url: String,
    /// How long to wait for the connection to establish.
    pub connect_timeout_secs: u64,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:4000".into(),
            connect_timeout_secs: 15,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Events & Commands
// ---------------------------------------------------------------------------

/// Events emitted by the transport channel.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// Connection established.
    Connected,
    /// Connection lost; the background loop will retry.
    Disconnected,
    /// A decoded frame from the relay.
    Message(ServerMessage),
    /// Connect failure or timeout.
    Error(String),
}

/// Commands sent to the background connection loop.
#[derive(Debug)]
pub(crate) enum ChannelCommand {
    Send(ClientMessage),
    Disconnect,
}
