use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::types::Outcome;

/// Running tally of finished games, persisted between sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBook {
    pub x: u32,
    pub o: u32,
    pub draws: u32,
}

impl ScoreBook {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::XWins => self.x += 1,
            Outcome::OWins => self.o += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::InProgress => {}
        }
    }

    pub fn games_played(&self) -> u32 {
        self.x + self.o + self.draws
    }

    pub fn summary(&self) -> String {
        format!("X: {} | O: {} | Draws: {}", self.x, self.o, self.draws)
    }
}

impl Validate for ScoreBook {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
