use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use common::RoomCode;
use common::games::tictactoe::{Board, Line, Mark, Outcome, outcome, outcome_line};

use crate::room_store::{ChatEntry, RoomRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateRoom { name: String },
    JoinRoom { code: String, name: String },
    PlaceMark { index: usize },
    Restart,
    Chat { text: String },
    Leave,
    Ping { id: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Joined {
        code: RoomCode,
        mark: Mark,
        room: RoomSnapshot,
    },
    RoomState {
        room: RoomSnapshot,
    },
    Chat {
        entry: ChatEntry,
    },
    ChatHistory {
        entries: Vec<ChatEntry>,
    },
    Error {
        message: String,
    },
    Pong {
        id: u64,
    },
}

impl ServerMessage {
    pub fn error(message: impl std::fmt::Display) -> Self {
        ServerMessage::Error {
            message: message.to_string(),
        }
    }
}

/// Room record plus the derived outcome, so browsers never re-run the rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub board: Board,
    pub turn: Mark,
    pub game_over: bool,
    pub players: BTreeMap<Mark, String>,
    pub outcome: Outcome,
    pub winning_line: Option<Line>,
}

impl From<&RoomRecord> for RoomSnapshot {
    fn from(record: &RoomRecord) -> Self {
        Self {
            board: record.board,
            turn: record.turn,
            game_over: record.game_over,
            players: record.players.clone(),
            outcome: outcome(&record.board),
            winning_line: outcome_line(&record.board),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages_parse() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"place_mark","index":4}"#).unwrap();
        assert_eq!(msg, ClientMessage::PlaceMark { index: 4 });

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"restart"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Restart);

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"join_room","code":"ab12cd","name":"Ben"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinRoom {
                code: "ab12cd".to_string(),
                name: "Ben".to_string()
            }
        );

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"teleport"}"#).is_err());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut players = BTreeMap::new();
        players.insert(Mark::X, "Ana".to_string());
        let record = RoomRecord {
            board: Board::parse("XXXOO....").unwrap(),
            turn: Mark::X,
            game_over: true,
            players,
        };

        let json = serde_json::to_value(ServerMessage::RoomState {
            room: RoomSnapshot::from(&record),
        })
        .unwrap();

        assert_eq!(json["type"], "room_state");
        assert_eq!(json["room"]["board"][0], "X");
        assert_eq!(json["room"]["board"][8], " ");
        assert_eq!(json["room"]["turn"], "X");
        assert_eq!(json["room"]["players"]["X"], "Ana");
        assert_eq!(json["room"]["outcome"], "x_wins");
        assert_eq!(json["room"]["winning_line"], serde_json::json!([0, 1, 2]));
    }
}
