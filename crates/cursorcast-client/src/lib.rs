pub mod chat;
pub mod identity;
pub mod presence;
pub mod transport;

pub use chat::{
    ChatActivation, ChatInput, KeyInput, KeyOutcome, MonospaceMeasure, TextMeasure,
    DEFAULT_INPUT_WIDTH,
};
pub use identity::LocalIdentity;
pub use presence::{
    PresenceConfig, PresenceEvent, PresencePublisher, PresenceReconciler, PresenceRecord,
    PresenceSession,
};
pub use transport::{ChannelClient, ChannelConfig, ChannelEvent};
