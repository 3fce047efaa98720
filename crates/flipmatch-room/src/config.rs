//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration shared by every room a registry spawns.
///
/// `reveal_delay` is how long a mismatched pair stays face-up before the
/// room hides it again and passes the turn. Tests shrink it to keep the
/// suite fast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Minimum player slots required to start a game.
    pub min_players: usize,

    /// Maximum player slots. Further joiners become spectators.
    pub max_players: usize,

    /// Delay before a mismatched pair is hidden again.
    pub reveal_delay: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 5,
            reveal_delay: Duration::from_secs(1),
        }
    }
}
