//! Local display identity.
//!
//! The username is picked once per session and never renegotiated. The user
//! id is deliberately absent here: the relay assigns it at connect time.

use rand::seq::SliceRandom;

/// Marker prepended to every generated username.
pub const NAME_PREFIX: &str = "User-";

/// Fixed pool the session username is sampled from.
const NAME_POOL: &[&str] = &[
    "Fox", "Owl", "Lynx", "Otter", "Hawk", "Bear", "Wolf", "Hare", "Crow", "Mole",
];

/// Display identity for the local participant.
#[derive(Debug, Clone)]
pub struct LocalIdentity {
    pub username: String,
}

impl LocalIdentity {
    /// Sample a username from the fixed pool, e.g. `User-Fox`.
    pub fn generate() -> Self {
        let name = NAME_POOL
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("Fox");
        Self {
            username: format!("{NAME_PREFIX}{name}"),
        }
    }

    /// Use an explicit username instead of sampling one.
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
