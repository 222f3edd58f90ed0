use std::time::Instant;

use common::config::{ConfigManager, FileContentConfigProvider, YamlConfigSerializer};
use common::games::tictactoe::{Difficulty, GameMode, Mark, Outcome, ScoreBook};
use common::log;
use eframe::egui;

use super::board::BoardView;
use crate::offline::LocalGame;

pub type ScoresManager = ConfigManager<FileContentConfigProvider, ScoreBook, YamlConfigSerializer>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeChoice {
    TwoPlayer,
    VsComputer,
}

impl ModeChoice {
    fn label(self) -> &'static str {
        match self {
            ModeChoice::TwoPlayer => "Two players",
            ModeChoice::VsComputer => "Vs computer",
        }
    }
}

pub struct XoApp {
    game: LocalGame<ScoresManager>,
    board_view: BoardView,
    mode_choice: ModeChoice,
    difficulty: Difficulty,
    computer_mark: Mark,
    last_error: Option<String>,
}

impl XoApp {
    pub fn new(game: LocalGame<ScoresManager>, default_difficulty: Difficulty) -> Self {
        let (mode_choice, difficulty, computer_mark) = match game.mode() {
            GameMode::TwoPlayer => (ModeChoice::TwoPlayer, default_difficulty, Mark::O),
            GameMode::VsComputer { difficulty, computer_mark } => {
                (ModeChoice::VsComputer, difficulty, computer_mark)
            }
        };

        Self {
            game,
            board_view: BoardView::new(),
            mode_choice,
            difficulty,
            computer_mark,
            last_error: None,
        }
    }

    fn selected_mode(&self) -> GameMode {
        match self.mode_choice {
            ModeChoice::TwoPlayer => GameMode::TwoPlayer,
            ModeChoice::VsComputer => GameMode::VsComputer {
                difficulty: self.difficulty,
                computer_mark: self.computer_mark,
            },
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        let before = (self.mode_choice, self.difficulty, self.computer_mark);

        ui.horizontal(|ui| {
            egui::ComboBox::from_label("Mode")
                .selected_text(self.mode_choice.label())
                .show_ui(ui, |ui| {
                    for choice in [ModeChoice::TwoPlayer, ModeChoice::VsComputer] {
                        ui.selectable_value(&mut self.mode_choice, choice, choice.label());
                    }
                });

            if self.mode_choice == ModeChoice::VsComputer {
                egui::ComboBox::from_label("Difficulty")
                    .selected_text(self.difficulty.to_string())
                    .show_ui(ui, |ui| {
                        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                            ui.selectable_value(&mut self.difficulty, difficulty, difficulty.as_str());
                        }
                    });

                egui::ComboBox::from_label("Computer plays")
                    .selected_text(self.computer_mark.as_str())
                    .show_ui(ui, |ui| {
                        for mark in [Mark::X, Mark::O] {
                            ui.selectable_value(&mut self.computer_mark, mark, mark.as_str());
                        }
                    });
            }
        });

        let now = Instant::now();
        if before != (self.mode_choice, self.difficulty, self.computer_mark) {
            let mode = self.selected_mode();
            log!("Switching to {:?}", mode);
            self.game.set_mode(mode, now);
            self.last_error = None;
        }

        if ui.button("Restart").clicked() {
            self.game.restart(now);
            self.last_error = None;
        }
    }

    fn render_info_panel(&self, ui: &mut egui::Ui) {
        ui.heading("Tic-Tac-Toe");
        ui.separator();

        ui.label(format!("X: {}", self.game.name_of(Mark::X)));
        ui.label(format!("O: {}", self.game.name_of(Mark::O)));
        ui.separator();

        let status = self.game.status_text();
        match self.game.game().outcome() {
            Outcome::InProgress => ui.label(status),
            _ => ui.colored_label(egui::Color32::GREEN, egui::RichText::new(status).size(18.0).strong()),
        };

        if let Some(error) = &self.last_error {
            ui.colored_label(egui::Color32::RED, error);
        }

        ui.separator();
        ui.heading("Scores");
        ui.label(self.game.scores().summary());
    }
}

impl eframe::App for XoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.game.tick(now);
        if let Some(wait) = self.game.time_until_computer(now) {
            ctx.request_repaint_after(wait);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_controls(ui);
            ui.separator();

            ui.horizontal(|ui| {
                let interactive = !self.game.game().is_over() && !self.game.is_computer_thinking();
                let board = *self.game.game().board();
                let winning_line = self.game.game().winning_line();
                let last_move = self.game.game().last_move();

                if let Some(index) = self.board_view.show(ui, &board, winning_line, last_move, interactive) {
                    match self.game.click(index, Instant::now()) {
                        Ok(_) => self.last_error = None,
                        Err(e) => self.last_error = Some(e.to_string()),
                    }
                }

                ui.separator();
                ui.vertical(|ui| self.render_info_panel(ui));
            });
        });
    }
}
