use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Position is outside the board")]
    InvalidPosition,
    #[error("Deck faces are not paired evenly")]
    UnbalancedDeck,
    #[error("Board length does not match any difficulty")]
    UnrecognizedBoardSize,
    #[error("Player name is empty")]
    MissingPlayerName,
    #[error("Player name cannot be stored in the score log")]
    UnstorablePlayerName,
    #[error("No evaluation is armed")]
    NothingToResolve,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("No session is active")]
    NoActiveSession,
}

pub type Result<T> = core::result::Result<T, GameError>;
