//! Background task that folds `ChannelEvent`s into the reconciler and
//! emits `PresenceEvent`s.

use std::sync::Arc;

use cursorcast_common::{PresenceUpdate, ServerMessage, UserId};
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use super::reconciler::PresenceReconciler;
use super::types::{PresenceEvent, PresenceRecord};
use crate::transport::ChannelEvent;

pub(crate) async fn event_translator(
    mut channel_rx: mpsc::Receiver<ChannelEvent>,
    event_tx: mpsc::Sender<PresenceEvent>,
    reconciler: Arc<RwLock<PresenceReconciler>>,
    user_id: Arc<RwLock<Option<UserId>>>,
) {
    while let Some(channel_event) = channel_rx.recv().await {
        match channel_event {
            ChannelEvent::Connected => {
                let _ = event_tx.send(PresenceEvent::Connected).await;
            }
            ChannelEvent::Message(ServerMessage::Welcome { user_id: assigned }) => {
                debug!(user = %assigned, "Relay assigned our id");
                *user_id.write().await = Some(assigned);
            }
            ChannelEvent::Message(ServerMessage::ReceiveCursorAndChatData { payload }) => {
                // Lenient decode: missing fields default, so a degraded
                // payload still renders (blank username etc.).
                let update: PresenceUpdate =
                    serde_json::from_value(payload).unwrap_or_default();
                let record = PresenceRecord::from(update);
                let applied = reconciler.write().await.apply(record.clone());
                if applied {
                    let _ = event_tx.send(PresenceEvent::PeerUpdated(record)).await;
                }
            }
            ChannelEvent::Message(ServerMessage::UserDisconnected { user_id: departed }) => {
                let removed = reconciler.write().await.remove(&departed);
                if removed {
                    let _ = event_tx
                        .send(PresenceEvent::PeerLeft { user_id: departed })
                        .await;
                }
            }
            ChannelEvent::Disconnected => {
                let _ = event_tx.send(PresenceEvent::Disconnected).await;
            }
            ChannelEvent::Error(msg) => {
                let _ = event_tx.send(PresenceEvent::Error(msg)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        channel_tx: mpsc::Sender<ChannelEvent>,
        event_rx: mpsc::Receiver<PresenceEvent>,
        reconciler: Arc<RwLock<PresenceReconciler>>,
        user_id: Arc<RwLock<Option<UserId>>>,
    }

    fn spawn_translator() -> Harness {
        let (channel_tx, channel_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(16);
        let reconciler = Arc::new(RwLock::new(PresenceReconciler::new()));
        let user_id = Arc::new(RwLock::new(None));
        tokio::spawn(event_translator(
            channel_rx,
            event_tx,
            Arc::clone(&reconciler),
            Arc::clone(&user_id),
        ));
        Harness {
            channel_tx,
            event_rx,
            reconciler,
            user_id,
        }
    }

    fn update_payload(user_id: &str, chat_text: &str, seq: u64) -> serde_json::Value {
        serde_json::json!({
            "userId": user_id,
            "username": "User-Fox",
            "x": 100,
            "y": 50,
            "chatText": chat_text,
            "seq": seq,
        })
    }

    #[tokio::test]
    async fn welcome_records_the_assigned_id() {
        let mut h = spawn_translator();
        h.channel_tx
            .send(ChannelEvent::Message(ServerMessage::Welcome {
                user_id: UserId::from("a1"),
            }))
            .await
            .unwrap();

        // Connected event flushes after welcome so we can observe ordering.
        h.channel_tx.send(ChannelEvent::Connected).await.unwrap();
        assert!(matches!(
            h.event_rx.recv().await.unwrap(),
            PresenceEvent::Connected
        ));

        assert_eq!(*h.user_id.read().await, Some(UserId::from("a1")));
    }

    #[tokio::test]
    async fn incoming_update_upserts_and_notifies() {
        let mut h = spawn_translator();
        h.channel_tx
            .send(ChannelEvent::Message(
                ServerMessage::ReceiveCursorAndChatData {
                    payload: update_payload("a1", "hi", 1),
                },
            ))
            .await
            .unwrap();

        let event = h.event_rx.recv().await.unwrap();
        let PresenceEvent::PeerUpdated(record) = event else {
            panic!("expected PeerUpdated, got {event:?}");
        };
        assert_eq!(record.user_id, "a1");
        assert_eq!(record.chat_text, "hi");

        assert_eq!(h.reconciler.read().await.len(), 1);
    }

    #[tokio::test]
    async fn departure_removes_the_record_and_notifies() {
        let mut h = spawn_translator();
        h.channel_tx
            .send(ChannelEvent::Message(
                ServerMessage::ReceiveCursorAndChatData {
                    payload: update_payload("a1", "", 1),
                },
            ))
            .await
            .unwrap();
        let _ = h.event_rx.recv().await.unwrap();

        h.channel_tx
            .send(ChannelEvent::Message(ServerMessage::UserDisconnected {
                user_id: "a1".into(),
            }))
            .await
            .unwrap();

        let event = h.event_rx.recv().await.unwrap();
        assert!(matches!(event, PresenceEvent::PeerLeft { ref user_id } if user_id == "a1"));
        assert!(h.reconciler.read().await.is_empty());
    }

    #[tokio::test]
    async fn departure_of_unknown_user_emits_nothing() {
        let mut h = spawn_translator();
        h.channel_tx
            .send(ChannelEvent::Message(ServerMessage::UserDisconnected {
                user_id: "ghost".into(),
            }))
            .await
            .unwrap();
        h.channel_tx.send(ChannelEvent::Disconnected).await.unwrap();

        // The next observable event is the disconnect, not a PeerLeft.
        assert!(matches!(
            h.event_rx.recv().await.unwrap(),
            PresenceEvent::Disconnected
        ));
    }

    #[tokio::test]
    async fn degraded_payload_still_produces_a_record() {
        let mut h = spawn_translator();
        h.channel_tx
            .send(ChannelEvent::Message(
                ServerMessage::ReceiveCursorAndChatData {
                    payload: serde_json::json!({ "userId": "a1", "x": 3 }),
                },
            ))
            .await
            .unwrap();

        let PresenceEvent::PeerUpdated(record) = h.event_rx.recv().await.unwrap() else {
            panic!("expected PeerUpdated");
        };
        assert_eq!(record.user_id, "a1");
        assert_eq!(record.username, "");
        assert_eq!(record.x, 3);
    }

    #[tokio::test]
    async fn stale_update_is_swallowed() {
        let mut h = spawn_translator();
        h.channel_tx
            .send(ChannelEvent::Message(
                ServerMessage::ReceiveCursorAndChatData {
                    payload: update_payload("a1", "new", 5),
                },
            ))
            .await
            .unwrap();
        let _ = h.event_rx.recv().await.unwrap();

        h.channel_tx
            .send(ChannelEvent::Message(
                ServerMessage::ReceiveCursorAndChatData {
                    payload: update_payload("a1", "old", 2),
                },
            ))
            .await
            .unwrap();
        h.channel_tx.send(ChannelEvent::Disconnected).await.unwrap();

        // No PeerUpdated for the stale frame; the record keeps the new text.
        assert!(matches!(
            h.event_rx.recv().await.unwrap(),
            PresenceEvent::Disconnected
        ));
        assert_eq!(
            h.reconciler.read().await.get("a1").unwrap().chat_text,
            "new"
        );
    }
}
