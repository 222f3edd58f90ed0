mod config;
mod offline;
mod ui;

use std::time::{Duration, Instant};

use clap::Parser;
use common::games::tictactoe::{Difficulty, GameMode};
use common::logger::{self, LogTarget};
use common::log;
use eframe::egui;

use config::{DEFAULT_CONFIG_FILE, get_config_manager, get_scores_manager};
use offline::LocalGame;
use ui::XoApp;

#[derive(Parser)]
#[command(name = "xo_client", about = "Tic-tac-toe on this machine, against a friend or the computer")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Start against the computer instead of two-player.
    #[arg(long)]
    vs_computer: bool,

    /// Overrides `difficulty` from the config file.
    #[arg(long)]
    difficulty: Option<Difficulty>,

    #[arg(long)]
    x_name: Option<String>,

    #[arg(long)]
    o_name: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = args.use_log_prefix.then(|| "Client".to_string());
    logger::init_logger(prefix, LogTarget::Stderr);

    let config_manager = get_config_manager(&args.config);
    let mut config = config_manager.get_config()?;
    if let Some(name) = args.x_name {
        config.x_name = name;
    }
    if let Some(name) = args.o_name {
        config.o_name = name;
    }

    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }

    let mode = if args.vs_computer {
        GameMode::vs_computer(config.difficulty)
    } else {
        GameMode::TwoPlayer
    };
    log!("Starting {:?}, scores in {}", mode, config.scores_file);

    let game = LocalGame::new(
        mode,
        common::id_generator::display_name_or_generated(&config.x_name),
        common::id_generator::display_name_or_generated(&config.o_name),
        Duration::from_millis(config.computer_delay_ms),
        get_scores_manager(&config.scores_file),
        Instant::now(),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 520.0])
            .with_title("Tic-Tac-Toe"),
        ..Default::default()
    };

    eframe::run_native(
        "xo_client",
        options,
        Box::new(move |_cc| Ok(Box::new(XoApp::new(game, config.difficulty)))),
    )?;

    Ok(())
}
