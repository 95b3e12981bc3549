use core::fmt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sweepsync_core::{Coord, Coord2, FullState, GameConfig, PendingChange};

use crate::Result;

/// Identifies one board instance within a session. Later games always get larger ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game#{}", self.0)
    }
}

/// Commands sent to the context that owns the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerRequest {
    InitGame { config: GameConfig, seed: u64 },
    Reset,
    Reveal { x: Coord, y: Coord },
    SetFlag { x: Coord, y: Coord, flagged: bool },
    Chord { x: Coord, y: Coord },
    GetFullState,
}

impl WorkerRequest {
    pub const fn reveal((x, y): Coord2) -> Self {
        Self::Reveal { x, y }
    }

    pub const fn set_flag((x, y): Coord2, flagged: bool) -> Self {
        Self::SetFlag { x, y, flagged }
    }

    pub const fn chord((x, y): Coord2) -> Self {
        Self::Chord { x, y }
    }
}

/// Everything the board's context tells its consumer, in the order it happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerEvent {
    /// A new board replaced whatever came before. Patches for older games must be dropped.
    GameStarted { game: GameId, state: FullState },
    /// The board was torn down without a replacement.
    GameReset { game: GameId },
    Patch { game: GameId, change: PendingChange },
    FullState { game: GameId, state: FullState },
    ChordResult { game: GameId, revealed: bool },
    Error { game: Option<GameId>, message: String },
}

impl WorkerEvent {
    pub const fn game(&self) -> Option<GameId> {
        match self {
            Self::GameStarted { game, .. }
            | Self::GameReset { game }
            | Self::Patch { game, .. }
            | Self::FullState { game, .. }
            | Self::ChordResult { game, .. } => Some(*game),
            Self::Error { game, .. } => *game,
        }
    }
}

pub fn encode<T: Serialize>(message: &T) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}
