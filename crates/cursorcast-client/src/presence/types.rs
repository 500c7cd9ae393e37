//! Configuration, record, and event types for the presence session.

use cursorcast_common::PresenceUpdate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the presence session.
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    /// WebSocket URL of the relay.
    pub url: String,
    /// How long to wait for the connection to establish.
    pub connect_timeout_secs: u64,
    /// Reconnect delay (base) in seconds.
    pub reconnect_delay: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:4000".into(),
            connect_timeout_secs: 15,
            reconnect_delay: 1,
            max_reconnect_delay: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Last known state of one remote participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceRecord {
    pub user_id: String,
    pub username: String,
    pub x: i32,
    pub y: i32,
    /// Empty string means no active bubble.
    pub chat_text: String,
    /// The sender's sequence number this record was built from.
    pub seq: u64,
}

impl From<PresenceUpdate> for PresenceRecord {
    fn from(update: PresenceUpdate) -> Self {
        Self {
            user_id: update.user_id,
            username: update.username,
            x: update.x,
            y: update.y,
            chat_text: update.chat_text,
            seq: update.seq,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events emitted by the presence session for the UI to consume.
#[derive(Debug, Clone)]
pub enum PresenceEvent {
    Connected,
    Disconnected,
    /// A remote user's record was created or replaced.
    PeerUpdated(PresenceRecord),
    /// A remote user's connection closed and their record was dropped.
    PeerLeft { user_id: String },
    Error(String),
}
