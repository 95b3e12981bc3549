use thiserror::Error;

use crate::CellCount;

/// Precondition a command violated. The caller is expected to prevent these before they reach the board.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("cannot reveal a flagged cell")]
    RevealFlagged,
    #[error("cannot flag a revealed cell")]
    FlagRevealed,
    #[error("cell is already revealed")]
    AlreadyRevealed,
    #[error("game already ended, no new moves are accepted")]
    GameOver,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board must be at least 1x1")]
    InvalidSize,
    #[error("Board needs at least one mine")]
    NoMines,
    #[error("Too many mines, requested {requested} but at most {max} fit around a safe opening")]
    TooManyMines { requested: CellCount, max: CellCount },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),
    #[error("Pending change has no subscriber to receive it")]
    NoSubscriber,
}

impl GameError {
    /// Errors raised while building a board, as opposed to errors raised by a move.
    pub const fn is_construction(self) -> bool {
        matches!(
            self,
            Self::InvalidSize | Self::NoMines | Self::TooManyMines { .. }
        )
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
