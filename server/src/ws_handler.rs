use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use common::games::tictactoe::Mark;
use common::id_generator::{display_name_or_generated, normalize_room_code};
use common::{ConnectionId, RoomCode, log};

use crate::messages::{ClientMessage, RoomSnapshot, ServerMessage};
use crate::room_store::{RoomEvent, RoomStore};
use crate::web_server::WebServerState;

pub type ClientSender = mpsc::Sender<ServerMessage>;

const OUTBOX_CAPACITY: usize = 128;

struct Seat {
    code: RoomCode,
    mark: Mark,
    name: String,
    forwarder: JoinHandle<()>,
}

/// One websocket client's view of the room it sits in.
pub struct RoomSession {
    connection_id: ConnectionId,
    store: RoomStore,
    tx: ClientSender,
    seat: Option<Seat>,
}

impl RoomSession {
    pub fn new(connection_id: ConnectionId, store: RoomStore, tx: ClientSender) -> Self {
        Self {
            connection_id,
            store,
            tx,
            seat: None,
        }
    }

    pub fn seat(&self) -> Option<(&RoomCode, Mark)> {
        self.seat.as_ref().map(|seat| (&seat.code, seat.mark))
    }

    pub async fn handle_message(&mut self, message: ClientMessage) {
        match message {
            ClientMessage::CreateRoom { name } => self.handle_create_room(&name).await,
            ClientMessage::JoinRoom { code, name } => self.handle_join_room(&code, &name).await,
            ClientMessage::PlaceMark { index } => self.handle_place_mark(index).await,
            ClientMessage::Restart => self.handle_restart().await,
            ClientMessage::Chat { text } => self.handle_chat(&text).await,
            ClientMessage::Leave => self.leave_room().await,
            ClientMessage::Ping { id } => self.send(ServerMessage::Pong { id }).await,
        }
    }

    async fn handle_create_room(&mut self, name: &str) {
        self.leave_room().await;

        let name = display_name_or_generated(name);
        let (code, _) = self.store.create_room(&name, &self.connection_id).await;
        self.take_seat(code, Mark::X, name).await;
    }

    async fn handle_join_room(&mut self, code: &str, name: &str) {
        let Some(code) = normalize_room_code(code) else {
            self.send(ServerMessage::error("Enter room code")).await;
            return;
        };

        if let Some(seat) = &self.seat
            && seat.code == code
        {
            self.send(ServerMessage::error(format!("Already in room {}", code))).await;
            return;
        }
        self.leave_room().await;

        let name = display_name_or_generated(name);
        match self.store.join_room(&code, &name, &self.connection_id).await {
            Ok((mark, _)) => self.take_seat(code, mark, name).await,
            Err(e) => self.send(ServerMessage::error(e)).await,
        }
    }

    /// Queues `Joined` and the chat history before any live event. The
    /// receiver buffers updates published after the snapshot until the
    /// forwarder starts draining it.
    async fn take_seat(&mut self, code: RoomCode, mark: Mark, name: String) {
        let subscription = match self.store.subscribe(&code).await {
            Ok(subscription) => subscription,
            Err(e) => {
                self.send(ServerMessage::error(e)).await;
                return;
            }
        };

        log!("[conn:{}] Seated in room {} as {} ({})", self.connection_id, code, mark, name);

        self.send(ServerMessage::Joined {
            code: code.clone(),
            mark,
            room: RoomSnapshot::from(&subscription.record),
        })
        .await;
        if !subscription.chat.is_empty() {
            self.send(ServerMessage::ChatHistory {
                entries: subscription.chat,
            })
            .await;
        }
        let forwarder = spawn_forwarder(subscription.events, self.tx.clone());

        self.seat = Some(Seat {
            code,
            mark,
            name,
            forwarder,
        });
    }

    async fn handle_place_mark(&mut self, index: usize) {
        let Some((code, mark)) = self.seat().map(|(code, mark)| (code.clone(), mark)) else {
            self.send_not_seated_error("place a mark").await;
            return;
        };
        if let Err(e) = self.store.place_mark(&code, &self.connection_id, mark, index).await {
            self.send(ServerMessage::error(e)).await;
        }
    }

    async fn handle_restart(&mut self) {
        let Some(code) = self.seat().map(|(code, _)| code.clone()) else {
            self.send_not_seated_error("restart").await;
            return;
        };
        if let Err(e) = self.store.restart(&code, &self.connection_id).await {
            self.send(ServerMessage::error(e)).await;
        }
    }

    async fn handle_chat(&mut self, text: &str) {
        let Some((code, name)) = self.seat.as_ref().map(|seat| (seat.code.clone(), seat.name.clone())) else {
            self.send_not_seated_error("chat").await;
            return;
        };
        if let Err(e) = self.store.post_chat(&code, &name, text).await {
            self.send(ServerMessage::error(e)).await;
        }
    }

    pub async fn leave_room(&mut self) {
        let Some(seat) = self.seat.take() else {
            return;
        };
        seat.forwarder.abort();
        if let Err(e) = self.store.leave(&seat.code, seat.mark, &self.connection_id).await {
            log!("[conn:{}] Failed to leave room {}: {}", self.connection_id, seat.code, e);
        }
    }

    async fn send_not_seated_error(&self, action: &str) {
        self.send(ServerMessage::error(format!("Join a room to {}", action))).await;
    }

    async fn send(&self, message: ServerMessage) {
        if let Err(e) = self.tx.send(message).await {
            log!("[conn:{}] Failed to queue message: {}", self.connection_id, e);
        }
    }
}

fn spawn_forwarder(receiver: broadcast::Receiver<RoomEvent>, tx: ClientSender) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = BroadcastStream::new(receiver);
        while let Some(item) = events.next().await {
            let message = match item {
                Ok(RoomEvent::State(record)) => ServerMessage::RoomState {
                    room: RoomSnapshot::from(&record),
                },
                Ok(RoomEvent::Chat(entry)) => ServerMessage::Chat { entry },
                // States are whole snapshots, so the next one resyncs the client.
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    log!("Room subscriber lagged, skipped {} events", skipped);
                    continue;
                }
            };
            if tx.send(message).await.is_err() {
                break;
            }
        }
    })
}

pub async fn handle_websocket(socket: WebSocket, state: WebServerState, connection_id: ConnectionId) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(OUTBOX_CAPACITY);

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    log!("Failed to encode server message: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    log!("[conn:{}] WebSocket client connected", connection_id);
    let mut session = RoomSession::new(connection_id.clone(), state.room_store, tx);

    while let Some(result) = ws_receiver.next().await {
        let text = match result {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                log!("[conn:{}] WebSocket error: {}", connection_id, e);
                break;
            }
        };

        match serde_json::from_str::<ClientMessage>(text.as_str()) {
            Ok(message) => session.handle_message(message).await,
            Err(e) => {
                log!("[conn:{}] Failed to decode client message: {}", connection_id, e);
                session.send(ServerMessage::error("Malformed message")).await;
            }
        }
    }

    session.leave_room().await;
    drop(session);
    send_task.abort();
    log!("[conn:{}] WebSocket client disconnected", connection_id);
}
