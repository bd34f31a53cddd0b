use serde::{Deserialize, Serialize};

/// Unique identifier for a player within a session.
pub type PlayerId = u64;

/// Events emitted by a simulation step (eliminations, pickups, round end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerEliminated {
        player_id: PlayerId,
    },
    PowerUpCollected {
        player_id: PlayerId,
        powerup_id: u32,
    },
    ScoreUpdate {
        player_id: PlayerId,
        points: u32,
        total: u32,
    },
    /// Round finished; `ranking` is best to worst.
    RoundComplete {
        ranking: Vec<PlayerId>,
    },
    SessionComplete {
        winner_id: PlayerId,
    },
}

/// Cumulative score entry for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub score: u32,
}
