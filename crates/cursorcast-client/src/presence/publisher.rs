//! Local presence publisher.

use std::sync::Arc;

use cursorcast_common::{ClientMessage, PresenceUpdate, UserId};
use tokio::sync::RwLock;

use crate::transport::ChannelClient;

/// Publishes a combined cursor+chat snapshot on every local change.
///
/// Each trigger sends the full current state, so a pointer move carries the
/// current chat text and a chat edit carries the current cursor position.
/// There is no debouncing or batching: publish rate equals raw input rate.
pub struct PresencePublisher {
    channel: ChannelClient,
    username: String,
    /// Relay-assigned id, filled in once the `welcome` frame arrives.
    user_id: Arc<RwLock<Option<UserId>>>,
    cursor: (i32, i32),
    chat_text: String,
    seq: u64,
}

impl PresencePublisher {
    pub(crate) fn new(
        channel: ChannelClient,
        username: String,
        user_id: Arc<RwLock<Option<UserId>>>,
    ) -> Self {
        Self {
            channel,
            username,
            user_id,
            cursor: (0, 0),
            chat_text: String::new(),
            seq: 0,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The pointer moved: record it and publish immediately.
    pub async fn pointer_moved(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
        self.publish().await;
    }

    /// The chat buffer changed: record it and publish immediately. An empty
    /// string tells peers the bubble is gone.
    pub async fn chat_changed(&mut self, text: impl Into<String>) {
        self.chat_text = text.into();
        self.publish().await;
    }

    async fn publish(&mut self) {
        // Nothing to say until the relay has told us who we are.
        let Some(user_id) = self.user_id.read().await.clone() else {
            return;
        };

        self.seq += 1;
        let update = PresenceUpdate {
            user_id: user_id.to_string(),
            username: self.username.clone(),
            x: self.cursor.0,
            y: self.cursor.1,
            chat_text: self.chat_text.clone(),
            seq: self.seq,
        };
        match serde_json::to_value(&update) {
            Ok(payload) => {
                self.channel
                    .send(ClientMessage::CursorAndChatData { payload })
                    .await;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Failed to encode presence update");
            }
        }
    }
}
