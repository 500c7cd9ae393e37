//! Background WebSocket connection loop with auto-reconnect.

use std::sync::Arc;
use std::time::Duration;

use cursorcast_common::ServerMessage;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use super::types::{ChannelCommand, ChannelConfig, ChannelEvent};

/// Background task managing the WebSocket connection with auto-reconnect.
pub(crate) async fn connection_loop(
    config: ChannelConfig,
    connected: Arc<RwLock<bool>>,
    event_tx: mpsc::Sender<ChannelEvent>,
    mut command_rx: mpsc::Receiver<ChannelCommand>,
) {
    let mut reconnect_delay = config.reconnect_delay_secs;

    loop {
        info!(url = %config.url, "Connecting to relay");

        match tokio::time::timeout(
            Duration::from_secs(config.connect_timeout_secs),
            tokio_tungstenite::connect_async(&config.url),
        )
        .await
        {
            Ok(Ok((ws_stream, _))) => {
                reconnect_delay = config.reconnect_delay_secs;
                *connected.write().await = true;
                let _ = event_tx.send(ChannelEvent::Connected).await;

                let (mut sink, mut stream) = ws_stream.split();

                loop {
                    tokio::select! {
                        cmd = command_rx.recv() => {
                            match cmd {
                                Some(ChannelCommand::Send(message)) => {
                                    match message.to_json() {
                                        Ok(json) => {
                                            if sink.send(WsMessage::Text(json.into())).await.is_err() {
                                                break;
                                            }
                                        }
                                        Err(e) => {
                                            debug!(error = %e, "Failed to encode outbound frame");
                                        }
                                    }
                                }
                                // Explicit teardown: close and stop for good.
                                Some(ChannelCommand::Disconnect) | None => {
                                    let _ = sink.send(WsMessage::Close(None)).await;
                                    *connected.write().await = false;
                                    let _ = event_tx.send(ChannelEvent::Disconnected).await;
                                    return;
                                }
                            }
                        }

                        frame = stream.next() => {
                            match frame {
                                Some(Ok(WsMessage::Text(text))) => {
                                    match ServerMessage::from_json(&text) {
                                        Ok(msg) => {
                                            let _ = event_tx.send(ChannelEvent::Message(msg)).await;
                                        }
                                        Err(_) => {
                                            debug!(text = %text, "Unrecognized frame from relay");
                                        }
                                    }
                                }
                                Some(Ok(WsMessage::Ping(data))) => {
                                    let _ = sink.send(WsMessage::Pong(data)).await;
                                }
                                Some(Ok(WsMessage::Close(_))) | None => {
                                    info!("Relay closed connection");
                                    break;
                                }
                                Some(Err(e)) => {
                                    warn!(error = %e, "WebSocket error");
                                    break;
                                }
                                _ => {}
                            }
                        }
                    }
                }

                *connected.write().await = false;
                let _ = event_tx.send(ChannelEvent::Disconnected).await;
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to connect to relay");
                let _ = event_tx
                    .send(ChannelEvent::Error(format!("Connection failed: {e}")))
                    .await;
            }
            Err(_elapsed) => {
                error!(
                    "WebSocket connection timed out after {}s",
                    config.connect_timeout_secs
                );
                let _ = event_tx
                    .send(ChannelEvent::Error(format!(
                        "Connection timed out after {}s",
                        config.connect_timeout_secs
                    )))
                    .await;
            }
        }

        // Exponential backoff reconnect.
        info!(delay = reconnect_delay, "Reconnecting in {} seconds", reconnect_delay);
        tokio::time::sleep(Duration::from_secs(reconnect_delay)).await;
        reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay_secs);
    }
}
