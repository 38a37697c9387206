use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates out of range")]
    OutOfRange,
    #[error("Cells are not orthogonally adjacent")]
    InvalidAdjacency,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Invalid engine configuration")]
    InvalidConfig,
    #[error("Could not generate a board without free matches")]
    GenerationExhausted,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
