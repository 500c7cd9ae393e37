//! Wire protocol for the cursorcast relay.
//!
//! Messages are JSON text frames with a `"type"`-tagged envelope. Event names
//! are camelCase on the wire. The relay only parses the envelope of inbound
//! presence updates; the payload rides through as an opaque value so partial
//! or malformed payloads reach peers unchanged and degrade at the edges.

use serde::{Deserialize, Serialize};

use crate::errors::ProtocolError;
use crate::id::UserId;

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Frames a client sends to the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// A combined cursor-position + chat-text snapshot. The payload is
    /// opaque to the relay; see [`PresenceUpdate`] for the shape clients
    /// produce and consume.
    #[serde(rename_all = "camelCase")]
    CursorAndChatData { payload: serde_json::Value },
}

/// Frames the relay sends to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// First frame on every connection: the relay-assigned user id.
    #[serde(rename_all = "camelCase")]
    Welcome { user_id: UserId },

    /// A peer's presence update, re-broadcast to everyone but the sender.
    /// The relay stamps the sender's assigned `userId` into the payload.
    #[serde(rename_all = "camelCase")]
    ReceiveCursorAndChatData { payload: serde_json::Value },

    /// A peer's connection closed. Receivers drop that peer's record.
    #[serde(rename_all = "camelCase")]
    UserDisconnected { user_id: String },
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Presence payload
// ---------------------------------------------------------------------------

/// The presence snapshot that rides inside `cursorAndChatData` frames.
///
/// Every field defaults on the read path, so a partial payload decodes to a
/// degraded record (blank username, origin position) instead of failing.
/// `seq` is a per-sender logical sequence number; receivers use it to reject
/// out-of-order duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresenceUpdate {
    pub user_id: String,
    pub username: String,
    pub x: i32,
    pub y: i32,
    pub chat_text: String,
    pub seq: u64,
}
