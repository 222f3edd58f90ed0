use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{GameError, IllegalMoveReason};
use super::types::{Cell, Mark};
use super::win_detector::outcome;

pub const BOARD_SIDE: usize = 3;
pub const BOARD_CELLS: usize = BOARD_SIDE * BOARD_SIDE;

/// Nine cells in row-major order. Moves produce a new board instead of
/// mutating a shared one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([Cell; BOARD_CELLS]);

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; BOARD_CELLS]) -> Self {
        Self(cells)
    }

    /// Reads nine symbols, `X`, `O`, or one of ` `, `.`, `-` for an empty cell.
    /// Line breaks and `|` separators are ignored.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut cells = [Cell::Empty; BOARD_CELLS];
        let mut count = 0;
        for ch in text.chars().filter(|c| *c != '\n' && *c != '\r' && *c != '|') {
            let cell = match ch {
                'X' | 'x' => Cell::X,
                'O' | 'o' => Cell::O,
                ' ' | '.' | '-' => Cell::Empty,
                other => return Err(format!("Unexpected board symbol '{}'", other)),
            };
            if count == BOARD_CELLS {
                return Err(format!("Board has more than {} cells", BOARD_CELLS));
            }
            cells[count] = cell;
            count += 1;
        }
        if count != BOARD_CELLS {
            return Err(format!("Board needs {} cells, got {}", BOARD_CELLS, count));
        }
        Ok(Self::from_cells(cells))
    }

    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.0.get(index).copied()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|cell| !cell.is_empty())
    }

    pub fn count(&self, mark: Mark) -> usize {
        let target = Cell::from(mark);
        self.0.iter().filter(|&&cell| cell == target).count()
    }

    pub fn occupied(&self) -> usize {
        self.0.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Mark whose turn it is, assuming X opened the game.
    pub fn next_mark(&self) -> Mark {
        if self.count(Mark::X) > self.count(Mark::O) {
            Mark::O
        } else {
            Mark::X
        }
    }

    /// Copy of this board with `mark` placed at `index`. No legality checks;
    /// the search uses this on cells it already knows are empty.
    pub fn with_mark(&self, index: usize, mark: Mark) -> Self {
        let mut cells = self.0;
        cells[index] = Cell::from(mark);
        Self(cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_idx, row) in self.0.chunks(BOARD_SIDE).enumerate() {
            if row_idx > 0 {
                writeln!(f, "---+---+---")?;
            }
            writeln!(
                f,
                " {} | {} | {} ",
                row[0].symbol(),
                row[1].symbol(),
                row[2].symbol()
            )?;
        }
        Ok(())
    }
}

pub fn get_available_moves(board: &Board) -> Vec<usize> {
    board
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_empty())
        .map(|(index, _)| index)
        .collect()
}

/// Places `mark` at `index` and returns the resulting board.
///
/// Fails when the index is off the board, the cell is taken, or the board
/// already holds a win or a draw. The input board is never modified.
pub fn apply_move(board: &Board, index: usize, mark: Mark) -> Result<Board, GameError> {
    let cell = board
        .get(index)
        .ok_or(IllegalMoveReason::OutOfRange(index))?;

    if outcome(board).is_terminal() {
        return Err(IllegalMoveReason::GameOver.into());
    }

    if !cell.is_empty() {
        return Err(IllegalMoveReason::Occupied(index).into());
    }

    Ok(board.with_mark(index, mark))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let board = Board::parse("XO.|.X.|..O").unwrap();
        assert_eq!(board.get(0), Some(Cell::X));
        assert_eq!(board.get(1), Some(Cell::O));
        assert_eq!(board.get(4), Some(Cell::X));
        assert_eq!(board.get(8), Some(Cell::O));
        assert_eq!(board.get(9), None);
        assert_eq!(
            board.to_string(),
            " X | O |   \n---+---+---\n   | X |   \n---+---+---\n   |   | O \n"
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Board::parse("XO").is_err());
        assert!(Board::parse("XOXOXOXOXO").is_err());
        assert!(Board::parse("XOXOZOXOX").is_err());
    }

    #[test]
    fn test_available_moves_ascending() {
        let board = Board::parse("X.O.X.O..").unwrap();
        assert_eq!(get_available_moves(&board), vec![1, 3, 5, 7, 8]);
    }

    #[test]
    fn test_apply_move_returns_new_board() {
        let board = Board::new();
        let next = apply_move(&board, 4, Mark::X).unwrap();
        assert_eq!(next.get(4), Some(Cell::X));
        assert_eq!(board, Board::new());
        assert_eq!(next.next_mark(), Mark::O);
    }

    #[test]
    fn test_apply_move_on_occupied_cell() {
        let board = Board::parse("X........").unwrap();
        let before = board;
        assert_eq!(
            apply_move(&board, 0, Mark::O),
            Err(GameError::IllegalMove(IllegalMoveReason::Occupied(0)))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_move_out_of_range() {
        assert_eq!(
            apply_move(&Board::new(), 9, Mark::X),
            Err(GameError::IllegalMove(IllegalMoveReason::OutOfRange(9)))
        );
    }

    #[test]
    fn test_apply_move_after_game_over() {
        let board = Board::parse("XXXOO....").unwrap();
        assert_eq!(
            apply_move(&board, 8, Mark::O),
            Err(GameError::IllegalMove(IllegalMoveReason::GameOver))
        );
    }

    #[test]
    fn test_apply_move_shrinks_available_moves() {
        let board = Board::parse("X...O....").unwrap();
        let before = get_available_moves(&board);
        for &index in &before {
            let next = apply_move(&board, index, Mark::X).unwrap();
            let after = get_available_moves(&next);
            assert_eq!(after.len() + 1, before.len());
            assert!(!after.contains(&index));
        }
    }

    #[test]
    fn test_deserialize_requires_nine_cells() {
        let ok: Board = serde_json::from_str(r#"["X"," "," "," ","O"," "," "," "," "]"#).unwrap();
        assert_eq!(ok.occupied(), 2);
        assert!(serde_json::from_str::<Board>(r#"["X"," "]"#).is_err());
    }
}
