//! Presence session: wires the transport channel, publisher, and
//! reconciler together for one participant.

use std::sync::Arc;

use cursorcast_common::UserId;
use tokio::sync::{mpsc, RwLock};

use super::publisher::PresencePublisher;
use super::reconciler::PresenceReconciler;
use super::translator::event_translator;
use super::types::{PresenceConfig, PresenceEvent, PresenceRecord};
use crate::identity::LocalIdentity;
use crate::transport::{ChannelClient, ChannelConfig};

/// One participant's presence session.
///
/// Owns the transport channel (opened by [`start`](Self::start), closed by
/// [`disconnect`](Self::disconnect)) and the reconciled view of everyone
/// else. Publishers are handed out on demand and share the channel.
pub struct PresenceSession {
    config: PresenceConfig,
    identity: LocalIdentity,
    channel: Option<ChannelClient>,
    /// Relay-assigned id, shared with publishers and the translator.
    user_id: Arc<RwLock<Option<UserId>>>,
    reconciler: Arc<RwLock<PresenceReconciler>>,
}

impl PresenceSession {
    pub fn new(identity: LocalIdentity, config: PresenceConfig) -> Self {
        Self {
            config,
            identity,
            channel: None,
            user_id: Arc::new(RwLock::new(None)),
            reconciler: Arc::new(RwLock::new(PresenceReconciler::new())),
        }
    }

    /// Open the channel and start reconciling. Returns a receiver of
    /// presence events for the embedding UI; rendering state can also be
    /// pulled with [`snapshot`](Self::snapshot).
    pub fn start(&mut self) -> mpsc::Receiver<PresenceEvent> {
        let (event_tx, event_rx) = mpsc::channel(256);

        let channel_config = ChannelConfig {
            url: self.config.url.clone(),
            connect_timeout_secs: self.config.connect_timeout_secs,
            reconnect_delay_secs: self.config.reconnect_delay,
            max_reconnect_delay_secs: self.config.max_reconnect_delay,
        };
        let (client, channel_rx) = ChannelClient::connect(channel_config);

        tokio::spawn(event_translator(
            channel_rx,
            event_tx,
            Arc::clone(&self.reconciler),
            Arc::clone(&self.user_id),
        ));

        self.channel = Some(client);
        event_rx
    }

    /// A publisher bound to this session's channel and username.
    /// None before [`start`](Self::start).
    pub fn publisher(&self) -> Option<PresencePublisher> {
        self.channel.as_ref().map(|channel| {
            PresencePublisher::new(
                channel.clone_sender(),
                self.identity.username.clone(),
                Arc::clone(&self.user_id),
            )
        })
    }

    /// Render-ready list of every known remote user.
    pub async fn snapshot(&self) -> Vec<PresenceRecord> {
        self.reconciler.read().await.snapshot()
    }

    /// The relay-assigned id, once the `welcome` frame has arrived.
    pub async fn user_id(&self) -> Option<UserId> {
        self.user_id.read().await.clone()
    }

    /// Check if the channel is currently connected.
    pub async fn is_connected(&self) -> bool {
        match &self.channel {
            Some(channel) => channel.is_connected().await,
            None => false,
        }
    }

    /// Close the channel. The reconciled records stay readable.
    pub async fn disconnect(&self) {
        if let Some(channel) = &self.channel {
            channel.disconnect().await;
        }
    }

    pub fn identity(&self) -> &LocalIdentity {
        &self.identity
    }
}
