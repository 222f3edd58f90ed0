use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use common::games::SessionRng;
use common::games::tictactoe::{
    Board, Difficulty, Line, Mark, Outcome, apply_move, choose_computer_move, empty_cells, outcome,
    outcome_line,
};
use common::log;

use crate::web_server::WebServerState;

#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    pub board: Board,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub mark: Option<Mark>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub board: Board,
    #[serde(rename = "move")]
    pub chosen: Option<usize>,
    pub outcome: Outcome,
    pub winning_line: Option<Line>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    pub board: Board,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub outcome: Outcome,
    pub winning_line: Option<Line>,
    pub empty_cells: Vec<usize>,
    pub next_mark: Option<Mark>,
}

/// Plays one computer move on the submitted board. The computer is O unless the
/// request says otherwise. Finished boards come back untouched.
pub fn compute_move(request: &MoveRequest, default_difficulty: Difficulty, rng: &mut SessionRng) -> MoveResponse {
    let difficulty = request.difficulty.unwrap_or(default_difficulty);
    let mark = request.mark.unwrap_or(Mark::O);

    let mut board = request.board;
    let mut chosen = None;

    if !outcome(&board).is_terminal()
        && let Ok(index) = choose_computer_move(&board, difficulty, mark, rng)
        && let Ok(next) = apply_move(&board, index, mark)
    {
        board = next;
        chosen = Some(index);
    }

    MoveResponse {
        board,
        chosen,
        outcome: outcome(&board),
        winning_line: outcome_line(&board),
    }
}

pub fn evaluate(board: &Board) -> EvaluateResponse {
    let result = outcome(board);
    EvaluateResponse {
        outcome: result,
        winning_line: outcome_line(board),
        empty_cells: empty_cells(board),
        next_mark: (!result.is_terminal()).then(|| board.next_mark()),
    }
}

pub async fn move_handler(
    State(state): State<WebServerState>,
    Json(request): Json<MoveRequest>,
) -> Json<MoveResponse> {
    let mut rng = SessionRng::from_random();
    let response = compute_move(&request, state.default_difficulty, &mut rng);
    if let Some(index) = response.chosen {
        log!(
            "Computer ({}) played {} at {}",
            request.difficulty.unwrap_or(state.default_difficulty),
            request.mark.unwrap_or(Mark::O),
            index
        );
    }
    Json(response)
}

pub async fn evaluate_handler(Json(request): Json<EvaluateRequest>) -> Json<EvaluateResponse> {
    Json(evaluate(&request.board))
}
