use super::types::Mark;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    OutOfRange(usize),
    Occupied(usize),
    GameOver,
    NotYourTurn(Mark),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    IllegalMove(IllegalMoveReason),
    NoLegalMove,
}

impl std::fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMoveReason::OutOfRange(index) => write!(f, "cell {} is off the board", index),
            IllegalMoveReason::Occupied(index) => write!(f, "cell {} is already marked", index),
            IllegalMoveReason::GameOver => write!(f, "game is already over"),
            IllegalMoveReason::NotYourTurn(mark) => write!(f, "it is {}'s turn", mark),
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::IllegalMove(reason) => write!(f, "Illegal move: {}", reason),
            GameError::NoLegalMove => write!(f, "No legal move: the board is full"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<IllegalMoveReason> for GameError {
    fn from(reason: IllegalMoveReason) -> Self {
        GameError::IllegalMove(reason)
    }
}
