use serde::{Deserialize, Serialize};

/// Player power size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeState {
    #[default]
    Small,
    Big,
}

/// Notifications raised during a tick. Queued as they happen and drained
/// once per tick, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelEvent {
    SizeChanged(SizeState),
    PlayerDied {
        lives_left: u32,
    },
    PlayerRespawned,
    /// A power-up was collected while already big and is held in reserve.
    PowerUpStored,
    CoinCollected,
    /// The player reached the finish line.
    LevelClosed,
    /// The end-of-level delay after closing has run out.
    LevelComplete,
    TimeUp,
    GameOver,
}
