//! Per-connection handler: assign an id, register, then relay frames.

use std::net::SocketAddr;

use cursorcast_common::{ClientMessage, ServerMessage, UserId};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;

use crate::registry::{ConnectionRegistry, OUTBOUND_QUEUE};

/// Handle a single WebSocket connection for its whole lifetime.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    registry: ConnectionRegistry,
    allowed_origin: String,
) {
    let callback = |req: &Request, response: Response| check_origin(req, response, &allowed_origin);
    let ws = match tokio_tungstenite::accept_hdr_async(stream, callback).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
            return;
        }
    };

    // The relay, not the client, decides who this connection is.
    let user_id = UserId::new();
    let (mut sink, mut stream) = ws.split();
    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_QUEUE);

    registry.register(user_id.clone(), tx).await;
    tracing::info!(peer = %addr, user = %user_id, "Client connected");

    // Tell the client its assigned id before anything else.
    let welcome = ServerMessage::Welcome {
        user_id: user_id.clone(),
    };
    match welcome.to_json() {
        Ok(json) => {
            if sink.send(Message::Text(json.into())).await.is_err() {
                registry.unregister(&user_id).await;
                return;
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode welcome frame");
            registry.unregister(&user_id).await;
            return;
        }
    }

    loop {
        tokio::select! {
            // Frames queued for this client → its WebSocket.
            Some(frame) = rx.recv() => {
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }

            // Frames from this client → everyone else.
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(&registry, &user_id, &text).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    tracing::info!(peer = %addr, user = %user_id, "Client disconnected");

    // Unregister first so the departure notice cannot loop back to a
    // half-closed connection, then tell the remaining peers.
    registry.unregister(&user_id).await;
    let departure = ServerMessage::UserDisconnected {
        user_id: user_id.to_string(),
    };
    if let Ok(json) = departure.to_json() {
        registry.broadcast_except(&user_id, &json).await;
    }
}

/// Dispatch one inbound text frame from `sender`.
///
/// Presence updates are re-broadcast to every other connection with the
/// sender's assigned id stamped into the payload; whatever `userId` the
/// client wrote is discarded, so no client can speak as another. Beyond the
/// envelope, the payload is not validated; a partial payload reaches peers
/// as-is and degrades at the receiving edge.
pub(crate) async fn handle_frame(registry: &ConnectionRegistry, sender: &UserId, text: &str) {
    match ClientMessage::from_json(text) {
        Ok(ClientMessage::CursorAndChatData { mut payload }) => {
            if let Some(obj) = payload.as_object_mut() {
                obj.insert(
                    "userId".to_string(),
                    serde_json::Value::String(sender.to_string()),
                );
            }
            let frame = ServerMessage::ReceiveCursorAndChatData { payload };
            match frame.to_json() {
                Ok(json) => {
                    let delivered = registry.broadcast_except(sender, &json).await;
                    tracing::trace!(user = %sender, delivered, "Relayed presence update");
                }
                Err(e) => {
                    tracing::debug!(user = %sender, error = %e, "Failed to encode relay frame");
                }
            }
        }
        Err(e) => {
            tracing::debug!(user = %sender, error = %e, "Ignoring unrecognized frame");
        }
    }
}

/// Reject browser connections from anywhere but the configured origin.
/// Requests without an Origin header (native peers, tests) pass through.
fn check_origin(
    req: &Request,
    response: Response,
    allowed_origin: &str,
) -> Result<Response, ErrorResponse> {
    match req.headers().get("Origin") {
        None => Ok(response),
        Some(origin) if origin.to_str().map(|o| o == allowed_origin).unwrap_or(false) => {
            Ok(response)
        }
        Some(origin) => {
            tracing::warn!(origin = ?origin, "Rejecting connection from disallowed origin");
            let mut resp = ErrorResponse::new(Some("origin not allowed".to_string()));
            *resp.status_mut() = StatusCode::FORBIDDEN;
            Err(resp)
        }
    }
}
