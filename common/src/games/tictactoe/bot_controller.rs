use crate::games::SessionRng;
use super::board::{Board, get_available_moves};
use super::error::GameError;
use super::types::{Difficulty, Mark};
use super::win_detector::check_win;

const WIN_SCORE: i32 = 10;

pub struct BotInput {
    pub board: Board,
    pub bot_mark: Mark,
}

impl BotInput {
    pub fn new(board: Board, bot_mark: Mark) -> Self {
        Self { board, bot_mark }
    }
}

/// Picks the computer's next cell.
///
/// Only the board copy inside `input` is looked at; the caller's board is
/// never touched. Fails with `NoLegalMove` on a full board.
pub fn calculate_move(
    difficulty: Difficulty,
    input: &BotInput,
    rng: &mut SessionRng,
) -> Result<usize, GameError> {
    let chosen = match difficulty {
        Difficulty::Easy => calculate_random_move(&input.board, rng),
        Difficulty::Medium => calculate_greedy_move(input, rng),
        Difficulty::Hard => calculate_minimax_move(input),
    };
    chosen.ok_or(GameError::NoLegalMove)
}

pub fn choose_computer_move(
    board: &Board,
    difficulty: Difficulty,
    bot_mark: Mark,
    rng: &mut SessionRng,
) -> Result<usize, GameError> {
    calculate_move(difficulty, &BotInput::new(*board, bot_mark), rng)
}

fn calculate_random_move(board: &Board, rng: &mut SessionRng) -> Option<usize> {
    rng.choose(&get_available_moves(board))
}

/// One-ply lookahead: win now, else block, else random. Forks go unnoticed.
fn calculate_greedy_move(input: &BotInput, rng: &mut SessionRng) -> Option<usize> {
    let available_moves = get_available_moves(&input.board);

    find_winning_move(&input.board, input.bot_mark, &available_moves)
        .or_else(|| find_winning_move(&input.board, input.bot_mark.opponent(), &available_moves))
        .or_else(|| rng.choose(&available_moves))
}

fn find_winning_move(board: &Board, mark: Mark, available_moves: &[usize]) -> Option<usize> {
    available_moves
        .iter()
        .copied()
        .find(|&index| check_win(&board.with_mark(index, mark), mark))
}

/// Full-depth minimax. Ties keep the lowest index.
pub fn calculate_minimax_move(input: &BotInput) -> Option<usize> {
    let mut best_move = None;
    let mut best_score = i32::MIN;

    for index in get_available_moves(&input.board) {
        let child = input.board.with_mark(index, input.bot_mark);
        let score = minimax(&child, 0, false, input.bot_mark);

        if score > best_score {
            best_score = score;
            best_move = Some(index);
        }
    }

    best_move
}

fn minimax(board: &Board, depth: i32, is_maximizing: bool, bot_mark: Mark) -> i32 {
    let opponent_mark = bot_mark.opponent();

    if check_win(board, bot_mark) {
        return WIN_SCORE - depth;
    }
    if check_win(board, opponent_mark) {
        return depth - WIN_SCORE;
    }

    let available_moves = get_available_moves(board);
    if available_moves.is_empty() {
        return 0;
    }

    let mover = if is_maximizing { bot_mark } else { opponent_mark };
    let scores = available_moves
        .into_iter()
        .map(|index| minimax(&board.with_mark(index, mover), depth + 1, !is_maximizing, bot_mark));

    if is_maximizing {
        scores.max().unwrap_or(0)
    } else {
        scores.min().unwrap_or(0)
    }
}
