mod cleanup_task;
mod http_api;
mod messages;
mod room_store;
mod server_config;
mod web_server;
mod ws_handler;

use std::path::PathBuf;

use clap::Parser;
use common::games::tictactoe::Difficulty;
use common::logger::{self, LogTarget};
use common::log;

use cleanup_task::CleanupTask;
use room_store::RoomStore;
use server_config::{DEFAULT_CONFIG_FILE, get_config_manager};
use web_server::{WebServerState, run_web_server};

#[derive(Parser)]
#[command(name = "xo_server", about = "Tic-tac-toe web server with online rooms")]
struct Args {
    /// YAML config file; defaults are used when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Overrides `bind_address` from the config file.
    #[arg(long)]
    bind: Option<String>,

    /// Overrides `static_dir` from the config file.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Overrides `default_difficulty` from the config file.
    #[arg(long)]
    difficulty: Option<Difficulty>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = args.use_log_prefix.then(|| "Server".to_string());
    logger::init_logger(prefix, LogTarget::Stdout);

    let mut config = get_config_manager(&args.config).get_config()?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(difficulty) = args.difficulty {
        config.default_difficulty = difficulty;
    }
    let static_dir = args
        .static_dir
        .unwrap_or_else(|| PathBuf::from(&config.static_dir));

    let room_store = RoomStore::new(config.chat);
    let cleanup = CleanupTask::new(
        room_store.clone(),
        config.cleanup.check_interval(),
        config.cleanup.inactivity_timeout(),
    );
    let cleanup_handle = tokio::spawn(async move { cleanup.run().await });

    let state = WebServerState::new(room_store, config.default_difficulty);
    log!("Computer default difficulty: {}", config.default_difficulty);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        log!("Shutdown signal received");
    };

    run_web_server(state, &config.bind_address, static_dir, shutdown_signal).await?;

    cleanup_handle.abort();
    log!("Server shut down gracefully");

    Ok(())
}
