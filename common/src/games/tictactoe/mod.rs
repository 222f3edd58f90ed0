mod board;
mod bot_controller;
mod error;
mod game_state;
mod score_book;
mod types;
mod win_detector;

pub use board::{BOARD_CELLS, BOARD_SIDE, Board, apply_move, get_available_moves};
pub use bot_controller::{BotInput, calculate_minimax_move, calculate_move, choose_computer_move};
pub use error::{GameError, IllegalMoveReason};
pub use game_state::{GameMode, Match};
pub use score_book::ScoreBook;
pub use types::{Cell, Difficulty, Mark, Outcome};
pub use win_detector::{
    Line, WIN_LINES, check_win, check_win_with_line, empty_cells, is_draw, outcome, outcome_line,
};
