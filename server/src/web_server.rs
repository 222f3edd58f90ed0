use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use common::games::tictactoe::Difficulty;
use common::{ConnectionId, log};

use crate::http_api::{evaluate_handler, move_handler};
use crate::room_store::RoomStore;
use crate::ws_handler::handle_websocket;

#[derive(Clone)]
pub struct WebServerState {
    pub room_store: RoomStore,
    pub default_difficulty: Difficulty,
    next_connection: Arc<AtomicU64>,
}

impl WebServerState {
    pub fn new(room_store: RoomStore, default_difficulty: Difficulty) -> Self {
        Self {
            room_store,
            default_difficulty,
            next_connection: Arc::new(AtomicU64::new(1)),
        }
    }

    fn next_connection_id(&self) -> ConnectionId {
        let id = self.next_connection.fetch_add(1, Ordering::Relaxed);
        ConnectionId::new(format!("c{}", id))
    }
}

pub fn build_router(state: WebServerState, static_files_path: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_upgrade_handler))
        .route("/api/move", post(move_handler))
        .route("/api/evaluate", post(evaluate_handler))
        .fallback_service(ServeDir::new(&static_files_path))
        .layer(cors)
        .with_state(state)
}

pub async fn run_web_server(
    state: WebServerState,
    bind_address: &str,
    static_files_path: PathBuf,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = build_router(state, static_files_path.clone());

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    log!(
        "Web server listening on {} (static files from {})",
        listener.local_addr()?,
        static_files_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    State(state): State<WebServerState>,
) -> impl IntoResponse {
    let connection_id = state.next_connection_id();
    ws.on_upgrade(move |socket| handle_websocket(socket, state, connection_id))
}
