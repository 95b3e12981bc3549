use sweepsync_core::GameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("No game is running")]
    NoGame,
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Malformed message: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("Worker is no longer running")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
