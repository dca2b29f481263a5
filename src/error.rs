use crate::location::Location;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coordinate {0:?}, expected a column a-i followed by a row 1-10")]
pub struct ParseLocationError(pub String);

/// Why the board refused a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("no piece at {0}")]
    EmptySource(Location),
    #[error("piece no longer stands on {0}")]
    StalePiece(Location),
    #[error("piece belongs to the other player")]
    WrongColor,
    #[error("destination is outside the piece's range")]
    OutOfRange,
    #[error("destination holds a friendly piece")]
    OwnPieceAtDestination,
    #[error("a cannon cannot capture a cannon")]
    CannonCapturesCannon,
    #[error("generals and guards must stay inside their palace")]
    OutsidePalace,
    #[error("path is blocked")]
    PathBlocked,
    #[error("a cannon needs exactly one piece to jump over")]
    CannonNeedsScreen,
    #[error("a cannon cannot jump over a cannon")]
    CannonOverCannon,
    #[error("horse is blocked")]
    HorseBlocked,
    #[error("elephant is blocked")]
    ElephantBlocked,
    #[error("general is in check and this move does not resolve it")]
    CheckNotResolved,
    #[error("general cannot move into a threatened square")]
    GeneralIntoThreat,
    #[error("move would leave the general in check")]
    ExposesGeneral,
}

/// Why the game refused a move request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    InvalidCoordinate(#[from] ParseLocationError),
    #[error("game is already over")]
    GameOver,
    #[error("cannot pass while in check")]
    PassWhileInCheck,
    #[error(transparent)]
    Illegal(#[from] IllegalMove),
}
