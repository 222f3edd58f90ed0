use crate::games::SessionRng;
use super::board::{Board, apply_move};
use super::bot_controller::choose_computer_move;
use super::error::{GameError, IllegalMoveReason};
use super::types::{Difficulty, Mark, Outcome};
use super::win_detector::{Line, check_win_with_line, is_draw};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    TwoPlayer,
    VsComputer {
        difficulty: Difficulty,
        computer_mark: Mark,
    },
}

impl GameMode {
    pub fn vs_computer(difficulty: Difficulty) -> Self {
        GameMode::VsComputer {
            difficulty,
            computer_mark: Mark::O,
        }
    }
}

/// One match on one board, owned by whoever drives the game loop.
#[derive(Debug)]
pub struct Match {
    board: Board,
    current_mark: Mark,
    outcome: Outcome,
    winning_line: Option<Line>,
    last_move: Option<usize>,
    mode: GameMode,
    rng: SessionRng,
}

impl Match {
    pub fn new(mode: GameMode, rng: SessionRng) -> Self {
        Self {
            board: Board::new(),
            current_mark: Mark::X,
            outcome: Outcome::InProgress,
            winning_line: None,
            last_move: None,
            mode,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn winning_line(&self) -> Option<Line> {
        self.winning_line
    }

    pub fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn is_computer_turn(&self) -> bool {
        match self.mode {
            GameMode::TwoPlayer => false,
            GameMode::VsComputer { computer_mark, .. } => {
                !self.is_over() && self.current_mark == computer_mark
            }
        }
    }

    /// Places the active mark at `index` and returns the resulting outcome.
    pub fn play(&mut self, index: usize) -> Result<Outcome, GameError> {
        if self.is_over() {
            return Err(IllegalMoveReason::GameOver.into());
        }

        let mark = self.current_mark;
        self.board = apply_move(&self.board, index, mark)?;
        self.last_move = Some(index);

        if let Some(line) = check_win_with_line(&self.board, mark) {
            self.outcome = Outcome::win_for(mark);
            self.winning_line = Some(line);
        } else if is_draw(&self.board) {
            self.outcome = Outcome::Draw;
        } else {
            self.current_mark = mark.opponent();
        }

        Ok(self.outcome)
    }

    /// Lets the computer take its turn; returns the cell it played.
    pub fn play_computer(&mut self) -> Result<usize, GameError> {
        let difficulty = match self.mode {
            GameMode::VsComputer { difficulty, .. } if self.is_computer_turn() => difficulty,
            _ if self.is_over() => return Err(IllegalMoveReason::GameOver.into()),
            _ => return Err(IllegalMoveReason::NotYourTurn(self.current_mark).into()),
        };

        let index = choose_computer_move(&self.board, difficulty, self.current_mark, &mut self.rng)?;
        self.play(index)?;
        Ok(index)
    }

    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_mark = Mark::X;
        self.outcome = Outcome::InProgress;
        self.winning_line = None;
        self.last_move = None;
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{Cell, check_win, empty_cells};

    fn two_player() -> Match {
        Match::new(GameMode::TwoPlayer, SessionRng::new(1))
    }

    #[test]
    fn test_turns_alternate_from_x() {
        let mut game = two_player();
        assert_eq!(game.current_mark(), Mark::X);
        game.play(0).unwrap();
        assert_eq!(game.current_mark(), Mark::O);
        game.play(1).unwrap();
        assert_eq!(game.current_mark(), Mark::X);
        assert_eq!(game.last_move(), Some(1));
    }

    #[test]
    fn test_top_row_win_sequence() {
        let mut game = two_player();
        for index in [0, 4, 1, 7] {
            assert_eq!(game.play(index), Ok(Outcome::InProgress));
        }
        assert_eq!(game.play(2), Ok(Outcome::XWins));
        assert!(check_win(game.board(), Mark::X));
        assert_eq!(game.winning_line(), Some([0, 1, 2]));
        assert!(game.is_over());
        assert_eq!(game.current_mark(), Mark::X);
    }

    #[test]
    fn test_no_moves_after_terminal_state() {
        let mut game = two_player();
        for index in [0, 4, 1, 7, 2] {
            game.play(index).unwrap();
        }
        let board = *game.board();
        assert_eq!(
            game.play(8),
            Err(GameError::IllegalMove(IllegalMoveReason::GameOver))
        );
        assert_eq!(*game.board(), board);
    }

    #[test]
    fn test_occupied_cell_keeps_turn() {
        let mut game = two_player();
        game.play(4).unwrap();
        assert_eq!(
            game.play(4),
            Err(GameError::IllegalMove(IllegalMoveReason::Occupied(4)))
        );
        assert_eq!(game.current_mark(), Mark::O);
        assert_eq!(game.board().occupied(), 1);
    }

    #[test]
    fn test_draw_detected() {
        let mut game = two_player();
        for index in [0, 1, 2, 4, 3, 5, 7, 6] {
            assert_eq!(game.play(index), Ok(Outcome::InProgress));
        }
        assert_eq!(game.play(8), Ok(Outcome::Draw));
        assert_eq!(game.winning_line(), None);
    }

    #[test]
    fn test_reset_restores_empty_board() {
        let mut game = two_player();
        for index in [0, 4, 1, 7, 2] {
            game.play(index).unwrap();
        }
        game.reset();
        assert_eq!(*game.board(), Board::new());
        assert_eq!(game.current_mark(), Mark::X);
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert_eq!(game.winning_line(), None);
        assert_eq!(empty_cells(game.board()).len(), 9);
    }

    #[test]
    fn test_computer_answers_center() {
        let mut game = Match::new(GameMode::vs_computer(Difficulty::Hard), SessionRng::new(2));
        assert!(!game.is_computer_turn());
        game.play(4).unwrap();
        assert!(game.is_computer_turn());

        let index = game.play_computer().unwrap();
        assert_eq!(game.board().get(index), Some(Cell::O));
        assert_eq!(game.board().occupied(), 2);
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert_eq!(game.current_mark(), Mark::X);
    }

    #[test]
    fn test_computer_refuses_human_turn() {
        let mut game = Match::new(GameMode::vs_computer(Difficulty::Easy), SessionRng::new(2));
        assert_eq!(
            game.play_computer(),
            Err(GameError::IllegalMove(IllegalMoveReason::NotYourTurn(Mark::X)))
        );

        let mut local = two_player();
        assert!(local.play_computer().is_err());
    }

    #[test]
    fn test_computer_can_open_as_x() {
        let mode = GameMode::VsComputer {
            difficulty: Difficulty::Medium,
            computer_mark: Mark::X,
        };
        let mut game = Match::new(mode, SessionRng::new(9));
        assert!(game.is_computer_turn());
        let index = game.play_computer().unwrap();
        assert_eq!(game.board().get(index), Some(Cell::X));
    }

    #[test]
    fn test_hard_computer_never_loses_full_game() {
        for seed in 0..10 {
            let mut rng = SessionRng::new(seed);
            let mut game = Match::new(GameMode::vs_computer(Difficulty::Hard), SessionRng::new(seed));
            while !game.is_over() {
                if game.is_computer_turn() {
                    game.play_computer().unwrap();
                } else {
                    let moves = empty_cells(game.board());
                    let index = rng.choose(&moves).unwrap();
                    game.play(index).unwrap();
                }
            }
            assert_ne!(game.outcome(), Outcome::XWins);
        }
    }
}
