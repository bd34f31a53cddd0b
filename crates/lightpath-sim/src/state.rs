use serde::{Deserialize, Serialize};

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    WaitingToStart,
    Running,
    Paused,
    /// Round finished, scores kept for the next round.
    RoundOver,
    /// Somebody met the win condition.
    SessionOver,
}

/// Round rules selected at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Classic,
    PowerUps,
}

impl GameMode {
    pub fn powerups_enabled(self) -> bool {
        matches!(self, GameMode::PowerUps)
    }
}

/// A command the session refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    InvalidTransition {
        state: GameState,
        command: &'static str,
    },
    InvalidPlayerCount {
        requested: usize,
        max: usize,
    },
    UnknownPlayer(usize),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { state, command } => {
                write!(f, "cannot {command} while {state:?}")
            },
            Self::InvalidPlayerCount { requested, max } => {
                write!(f, "player count {requested} outside 1..={max}")
            },
            Self::UnknownPlayer(slot) => write!(f, "no player in slot {slot}"),
        }
    }
}

impl std::error::Error for SessionError {}
