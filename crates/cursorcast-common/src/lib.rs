pub mod errors;
pub mod id;
pub mod protocol;

pub use errors::ProtocolError;
pub use id::{new_id, UserId};
pub use protocol::{ClientMessage, PresenceUpdate, ServerMessage};

pub type Result<T> = std::result::Result<T, ProtocolError>;
