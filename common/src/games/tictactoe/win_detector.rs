use super::board::{Board, get_available_moves};
use super::types::{Cell, Mark, Outcome};

pub type Line = [usize; 3];

/// Rows, then columns, then diagonals. The order is the tie-break for
/// `check_win_with_line` when more than one line is complete.
pub const WIN_LINES: [Line; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub fn check_win(board: &Board, mark: Mark) -> bool {
    check_win_with_line(board, mark).is_some()
}

pub fn check_win_with_line(board: &Board, mark: Mark) -> Option<Line> {
    let target = Cell::from(mark);
    let cells = board.cells();
    WIN_LINES
        .iter()
        .find(|line| line.iter().all(|&index| cells[index] == target))
        .copied()
}

pub fn is_draw(board: &Board) -> bool {
    board.is_full() && !check_win(board, Mark::X) && !check_win(board, Mark::O)
}

pub fn empty_cells(board: &Board) -> Vec<usize> {
    get_available_moves(board)
}

/// X is checked before O, which only matters for boards no legal game reaches.
pub fn outcome(board: &Board) -> Outcome {
    if check_win(board, Mark::X) {
        Outcome::XWins
    } else if check_win(board, Mark::O) {
        Outcome::OWins
    } else if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

/// Line to highlight for a finished game, if it was won.
pub fn outcome_line(board: &Board) -> Option<Line> {
    outcome(board)
        .winner()
        .and_then(|mark| check_win_with_line(board, mark))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_line_completed_by_last_cell() {
        for mark in [Mark::X, Mark::O] {
            for line in WIN_LINES {
                let board = Board::new()
                    .with_mark(line[0], mark)
                    .with_mark(line[1], mark);
                assert!(!check_win(&board, mark));

                let board = board.with_mark(line[2], mark);
                assert!(check_win(&board, mark));
                assert_eq!(check_win_with_line(&board, mark), Some(line));
                assert!(!check_win(&board, mark.opponent()));
            }
        }
    }

    fn all_boards() -> impl Iterator<Item = Board> {
        (0..3usize.pow(9)).map(|mut code| {
            let mut cells = [Cell::Empty; 9];
            for cell in cells.iter_mut() {
                *cell = match code % 3 {
                    0 => Cell::Empty,
                    1 => Cell::X,
                    _ => Cell::O,
                };
                code /= 3;
            }
            Board::from_cells(cells)
        })
    }

    #[test]
    fn test_last_empty_cell_completing_a_line() {
        for board in all_boards().filter(|b| b.occupied() == 8) {
            let index = empty_cells(&board)[0];
            for mark in [Mark::X, Mark::O] {
                let filled = board.with_mark(index, mark);
                let completes = WIN_LINES
                    .iter()
                    .any(|line| line.contains(&index) && line.iter().all(|&i| filled.get(i) == Some(Cell::from(mark))));
                if !completes || check_win(&board, mark) {
                    continue;
                }
                assert!(check_win(&filled, mark));
                let line = check_win_with_line(&filled, mark).unwrap();
                assert!(line.contains(&index));
                assert!(line.iter().all(|&i| filled.get(i) == Some(Cell::from(mark))));
            }
        }
    }

    #[test]
    fn test_every_full_board_is_draw_or_win() {
        for board in all_boards().filter(|b| b.is_full()) {
            let x_wins = check_win(&board, Mark::X);
            let o_wins = check_win(&board, Mark::O);
            assert_eq!(is_draw(&board), !x_wins && !o_wins);
        }
    }

    #[test]
    fn test_full_boards_without_line_are_draws() {
        let draws = ["XOXXOOOXX", "XXOOOXXOX", "OXOXXOXOX"];
        for text in draws {
            let board = Board::parse(text).unwrap();
            assert!(is_draw(&board), "{} should be a draw", text);
            assert!(!check_win(&board, Mark::X));
            assert!(!check_win(&board, Mark::O));
            assert_eq!(outcome(&board), Outcome::Draw);
            assert_eq!(outcome_line(&board), None);
        }
    }

    #[test]
    fn test_full_board_with_winner_is_not_draw() {
        let board = Board::parse("XXXOOXOXO").unwrap();
        assert!(board.is_full());
        assert!(!is_draw(&board));
        assert_eq!(outcome(&board), Outcome::XWins);
    }

    #[test]
    fn test_first_line_in_enumeration_order_wins() {
        // Row 0 and column 0 are both complete.
        let board = Board::parse("XXXX..X..").unwrap();
        assert_eq!(check_win_with_line(&board, Mark::X), Some([0, 1, 2]));

        let board = Board::parse("O.O.O.O.O").unwrap();
        assert_eq!(check_win_with_line(&board, Mark::O), Some([0, 4, 8]));
    }

    #[test]
    fn test_double_win_reports_x_first() {
        let board = Board::parse("XXXOOO...").unwrap();
        assert_eq!(outcome(&board), Outcome::XWins);
        assert_eq!(outcome_line(&board), Some([0, 1, 2]));
    }

    #[test]
    fn test_in_progress() {
        let board = Board::parse("XO..X....").unwrap();
        assert_eq!(outcome(&board), Outcome::InProgress);
        assert_eq!(empty_cells(&board), vec![2, 3, 5, 6, 7, 8]);
    }
}
