//! cursorcast-relay: WebSocket fan-out hub for shared-cursor presence.
//!
//! Accepts WebSocket connections, assigns each one a user id, and
//! re-broadcasts every presence update to all other connected clients.
//! The relay keeps no per-user presence state; all state lives at the
//! edges. On disconnect it notifies the remaining peers so they can drop
//! the departed user's record.

mod connection;
mod registry;

use clap::Parser;
use tokio::net::TcpListener;

use crate::connection::handle_connection;
use crate::registry::ConnectionRegistry;

#[derive(Parser)]
#[command(name = "cursorcast-relay", about = "WebSocket presence relay for cursorcast")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 4000)]
    port: u16,

    /// Browser origin allowed to open connections. Requests without an
    /// Origin header (non-browser peers) are always accepted.
    #[arg(long, default_value = "http://localhost:5173")]
    allowed_origin: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cursorcast_relay=info".into()),
        )
        .init();

    let args = Args::parse();
    let registry = ConnectionRegistry::new();

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind TCP listener");

    tracing::info!("cursorcast-relay listening on {}", addr);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let registry = registry.clone();
                let allowed_origin = args.allowed_origin.clone();
                tokio::spawn(async move {
                    handle_connection(stream, addr, registry, allowed_origin).await;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
