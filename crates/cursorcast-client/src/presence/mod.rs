//! Presence: publishing the local cursor+chat state and reconciling the
//! incoming stream of everyone else's.
//!
//! The relay is a pure fan-out switch, so each client folds the event
//! stream into its own map of latest-known records. The transport layer is
//! handled by `transport::ChannelClient`.

mod publisher;
mod reconciler;
mod session;
mod translator;
mod types;

pub use publisher::PresencePublisher;
pub use reconciler::PresenceReconciler;
pub use session::PresenceSession;
pub use types::{PresenceConfig, PresenceEvent, PresenceRecord};
