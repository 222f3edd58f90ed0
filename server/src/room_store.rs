use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};

use common::games::tictactoe::{Board, GameError, IllegalMoveReason, Mark, apply_move, outcome};
use common::id_generator::generate_room_code;
use common::{ConnectionId, RoomCode, log};

use crate::server_config::ChatConfig;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Replicated room document. Every update replaces it whole and the last
/// write wins; there is no merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub board: Board,
    pub turn: Mark,
    pub game_over: bool,
    pub players: BTreeMap<Mark, String>,
}

impl RoomRecord {
    fn new(host_name: String) -> Self {
        let mut players = BTreeMap::new();
        players.insert(Mark::X, host_name);
        Self {
            board: Board::new(),
            turn: Mark::X,
            game_over: false,
            players,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub sender: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    State(RoomRecord),
    Chat(ChatEntry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    NotFound(RoomCode),
    RoomFull(RoomCode),
    NotSeated(RoomCode),
    EmptyMessage,
    Game(GameError),
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomError::NotFound(code) => write!(f, "Room {} does not exist", code),
            RoomError::RoomFull(code) => write!(f, "Room {} already has two players", code),
            RoomError::NotSeated(code) => write!(f, "You no longer hold a seat in room {}", code),
            RoomError::EmptyMessage => write!(f, "Chat message is empty"),
            RoomError::Game(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RoomError {}

impl From<GameError> for RoomError {
    fn from(e: GameError) -> Self {
        RoomError::Game(e)
    }
}

/// What a new subscriber starts from. Everything published after `record` and
/// `chat` were read arrives on `events`, and nothing before it does.
pub struct RoomSubscription {
    pub events: broadcast::Receiver<RoomEvent>,
    pub record: RoomRecord,
    pub chat: Vec<ChatEntry>,
}

struct Room {
    record: RoomRecord,
    owners: HashMap<Mark, ConnectionId>,
    chat: Vec<ChatEntry>,
    events: broadcast::Sender<RoomEvent>,
    last_activity: Instant,
}

impl Room {
    fn new(record: RoomRecord, host: ConnectionId) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut owners = HashMap::new();
        owners.insert(Mark::X, host);
        Self {
            record,
            owners,
            chat: Vec::new(),
            events,
            last_activity: Instant::now(),
        }
    }

    fn holds(&self, mark: Mark, connection_id: &ConnectionId) -> bool {
        self.owners.get(&mark) == Some(connection_id)
    }

    fn publish_state(&mut self) {
        self.last_activity = Instant::now();
        // No subscribers is fine; the record is still stored.
        let _ = self.events.send(RoomEvent::State(self.record.clone()));
    }
}

/// In-process stand-in for the realtime store: one record and one chat log per
/// room code, with change notifications pushed to subscribers.
#[derive(Clone)]
pub struct RoomStore {
    rooms: Arc<Mutex<HashMap<RoomCode, Room>>>,
    chat_config: ChatConfig,
}

impl std::fmt::Debug for RoomStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomStore").finish()
    }
}

impl RoomStore {
    pub fn new(chat_config: ChatConfig) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            chat_config,
        }
    }

    pub async fn create_room(&self, host_name: &str, host: &ConnectionId) -> (RoomCode, RoomRecord) {
        let mut rooms = self.rooms.lock().await;

        let mut code = generate_room_code();
        while rooms.contains_key(&code) {
            code = generate_room_code();
        }

        let record = RoomRecord::new(host_name.to_string());
        rooms.insert(code.clone(), Room::new(record.clone(), host.clone()));
        log!("[room:{}] Created by {}", code, host_name);

        (code, record)
    }

    /// The joiner takes O. Rejoining under the current O name moves the seat to
    /// the new connection; the old one loses it.
    pub async fn join_room(
        &self,
        code: &RoomCode,
        name: &str,
        connection_id: &ConnectionId,
    ) -> Result<(Mark, RoomRecord), RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        let seat = if !room.record.players.contains_key(&Mark::X) {
            Mark::X
        } else {
            match room.record.players.get(&Mark::O) {
                Some(existing) if existing != name => return Err(RoomError::RoomFull(code.clone())),
                _ => Mark::O,
            }
        };

        if let Some(previous) = room.owners.insert(seat, connection_id.clone())
            && previous != *connection_id
        {
            log!("[room:{}] Seat {} moved from {} to {}", code, seat, previous, connection_id);
        }
        room.record.players.insert(seat, name.to_string());
        room.publish_state();
        log!("[room:{}] {} joined as {}", code, name, seat);

        Ok((seat, room.record.clone()))
    }

    /// Subscribes and reads the record and chat log under one lock.
    pub async fn subscribe(&self, code: &RoomCode) -> Result<RoomSubscription, RoomError> {
        let rooms = self.rooms.lock().await;
        let room = rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        Ok(RoomSubscription {
            events: room.events.subscribe(),
            record: room.record.clone(),
            chat: room.chat.clone(),
        })
    }

    pub async fn place_mark(
        &self,
        code: &RoomCode,
        connection_id: &ConnectionId,
        mark: Mark,
        index: usize,
    ) -> Result<RoomRecord, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        if !room.holds(mark, connection_id) {
            return Err(RoomError::NotSeated(code.clone()));
        }

        if room.record.game_over {
            return Err(GameError::from(IllegalMoveReason::GameOver).into());
        }
        if room.record.turn != mark {
            return Err(GameError::from(IllegalMoveReason::NotYourTurn(room.record.turn)).into());
        }

        let board = apply_move(&room.record.board, index, mark)?;
        let result = outcome(&board);

        room.record.board = board;
        room.record.game_over = result.is_terminal();
        if !room.record.game_over {
            room.record.turn = mark.opponent();
        }
        room.publish_state();

        if room.record.game_over {
            log!("[room:{}] Game over: {}", code, result);
        }

        Ok(room.record.clone())
    }

    pub async fn restart(&self, code: &RoomCode, connection_id: &ConnectionId) -> Result<RoomRecord, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        if !room.owners.values().any(|owner| owner == connection_id) {
            return Err(RoomError::NotSeated(code.clone()));
        }

        room.record.board = Board::new();
        room.record.turn = Mark::X;
        room.record.game_over = false;
        room.publish_state();
        log!("[room:{}] Restarted", code);

        Ok(room.record.clone())
    }

    pub async fn post_chat(&self, code: &RoomCode, sender: &str, text: &str) -> Result<ChatEntry, RoomError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoomError::EmptyMessage);
        }
        let text: String = text.chars().take(self.chat_config.max_message_length).collect();

        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        let entry = ChatEntry {
            sender: sender.to_string(),
            text,
        };
        room.chat.push(entry.clone());
        if room.chat.len() > self.chat_config.max_history {
            let overflow = room.chat.len() - self.chat_config.max_history;
            room.chat.drain(..overflow);
        }
        room.last_activity = Instant::now();
        let _ = room.events.send(RoomEvent::Chat(entry.clone()));

        Ok(entry)
    }

    /// Frees the seat if `connection_id` still holds it; returns true when the
    /// room was dropped as empty.
    pub async fn leave(&self, code: &RoomCode, mark: Mark, connection_id: &ConnectionId) -> Result<bool, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        if !room.holds(mark, connection_id) {
            return Ok(false);
        }

        room.owners.remove(&mark);
        if let Some(name) = room.record.players.remove(&mark) {
            log!("[room:{}] {} left seat {}", code, name, mark);
        }

        if room.record.players.is_empty() {
            rooms.remove(code);
            log!("[room:{}] Removed, no players left", code);
            return Ok(true);
        }

        room.publish_state();
        Ok(false)
    }

    pub async fn remove_inactive(&self, timeout: Duration) -> Vec<RoomCode> {
        let mut rooms = self.rooms.lock().await;
        let now = Instant::now();

        let inactive: Vec<RoomCode> = rooms
            .iter()
            .filter(|(_, room)| now.duration_since(room.last_activity) > timeout)
            .map(|(code, _)| code.clone())
            .collect();

        for code in &inactive {
            rooms.remove(code);
        }

        inactive
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}
