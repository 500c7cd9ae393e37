//! Transport channel: one persistent WebSocket to the relay.
//!
//! The channel is an explicitly constructed, owned object: opened at
//! session start, closed on teardown, passed into whatever needs it. The
//! background loop reconnects with exponential backoff; while the relay is
//! unreachable, sends vanish silently and no presence arrives.

mod client;
mod connection;
mod types;

pub use client::ChannelClient;
pub use types::{ChannelConfig, ChannelEvent};

pub(crate) use types::ChannelCommand;
