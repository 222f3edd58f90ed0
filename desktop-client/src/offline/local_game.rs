use std::time::{Duration, Instant};

use common::config::{ConfigContentProvider, ConfigManager, ConfigSerializer};
use common::games::SessionRng;
use common::games::tictactoe::{
    GameError, GameMode, IllegalMoveReason, Mark, Match, Outcome, ScoreBook,
};
use common::log;

pub trait ScoreSink {
    fn load(&self) -> Result<ScoreBook, String>;
    fn save(&self, scores: &ScoreBook) -> Result<(), String>;
}

impl<P, S> ScoreSink for ConfigManager<P, ScoreBook, S>
where
    P: ConfigContentProvider,
    S: ConfigSerializer<ScoreBook>,
{
    fn load(&self) -> Result<ScoreBook, String> {
        self.get_config()
    }

    fn save(&self, scores: &ScoreBook) -> Result<(), String> {
        self.set_config(scores)
    }
}

/// Drives a match on this machine: human clicks, the delayed computer reply,
/// and the running scoreboard.
pub struct LocalGame<S: ScoreSink> {
    game: Match,
    scores: ScoreBook,
    sink: S,
    x_name: String,
    o_name: String,
    computer_delay: Duration,
    computer_due: Option<Instant>,
}

impl<S: ScoreSink> LocalGame<S> {
    pub fn new(
        mode: GameMode,
        x_name: String,
        o_name: String,
        computer_delay: Duration,
        sink: S,
        now: Instant,
    ) -> Self {
        let scores = sink.load().unwrap_or_else(|e| {
            log!("Failed to load scores, starting from zero: {}", e);
            ScoreBook::default()
        });

        let mut local_game = Self {
            game: Match::new(mode, SessionRng::from_random()),
            scores,
            sink,
            x_name,
            o_name,
            computer_delay,
            computer_due: None,
        };
        local_game.schedule_computer(now);
        local_game
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn scores(&self) -> &ScoreBook {
        &self.scores
    }

    pub fn mode(&self) -> GameMode {
        self.game.mode()
    }

    pub fn name_of(&self, mark: Mark) -> &str {
        match self.game.mode() {
            GameMode::VsComputer { computer_mark, .. } if computer_mark == mark => "Computer",
            _ => match mark {
                Mark::X => &self.x_name,
                Mark::O => &self.o_name,
            },
        }
    }

    pub fn is_computer_thinking(&self) -> bool {
        self.computer_due.is_some()
    }

    pub fn time_until_computer(&self, now: Instant) -> Option<Duration> {
        self.computer_due
            .map(|due| due.saturating_duration_since(now))
    }

    pub fn status_text(&self) -> String {
        match self.game.outcome() {
            Outcome::InProgress if self.is_computer_thinking() => "Computer thinking...".to_string(),
            Outcome::InProgress => {
                let mark = self.game.current_mark();
                format!("Turn: {} ({})", mark, self.name_of(mark))
            }
            Outcome::Draw => "Draw!".to_string(),
            Outcome::XWins => format!("{} Wins!", self.name_of(Mark::X)),
            Outcome::OWins => format!("{} Wins!", self.name_of(Mark::O)),
        }
    }

    /// A human move. Clicks while the computer is to move are refused.
    pub fn click(&mut self, index: usize, now: Instant) -> Result<Outcome, GameError> {
        if self.game.is_computer_turn() {
            return Err(IllegalMoveReason::NotYourTurn(self.game.current_mark()).into());
        }
        let outcome = self.game.play(index)?;
        self.after_move(now);
        Ok(outcome)
    }

    /// Plays the computer's reply once its delay has passed.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        let due = self.computer_due?;
        if now < due {
            return None;
        }
        self.computer_due = None;

        match self.game.play_computer() {
            Ok(index) => {
                self.after_move(now);
                Some(index)
            }
            Err(e) => {
                log!("Computer could not move: {}", e);
                None
            }
        }
    }

    pub fn restart(&mut self, now: Instant) {
        self.game.reset();
        self.computer_due = None;
        self.schedule_computer(now);
    }

    pub fn set_mode(&mut self, mode: GameMode, now: Instant) {
        self.game.set_mode(mode);
        self.restart(now);
    }

    fn after_move(&mut self, now: Instant) {
        if self.game.is_over() {
            self.record_result();
        } else {
            self.schedule_computer(now);
        }
    }

    fn schedule_computer(&mut self, now: Instant) {
        if self.game.is_computer_turn() {
            self.computer_due = Some(now + self.computer_delay);
        }
    }

    fn record_result(&mut self) {
        let outcome = self.game.outcome();
        self.scores.record(outcome);
        log!("Game over: {} ({})", outcome, self.scores.summary());
        if let Err(e) = self.sink.save(&self.scores) {
            log!("Failed to save scores: {}", e);
        }
    }
}
