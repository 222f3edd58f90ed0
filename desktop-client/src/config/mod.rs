use serde::{Deserialize, Serialize};

use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::games::tictactoe::{Difficulty, ScoreBook};

pub const DEFAULT_CONFIG_FILE: &str = "xo_client_config.yaml";

pub fn get_config_manager(
    path: &str,
) -> ConfigManager<FileContentConfigProvider, ClientConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

pub fn get_scores_manager(
    path: &str,
) -> ConfigManager<FileContentConfigProvider, ScoreBook, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ClientConfig {
    pub x_name: String,
    pub o_name: String,
    pub difficulty: Difficulty,
    pub computer_delay_ms: u64,
    pub scores_file: String,
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<(), String> {
        if self.computer_delay_ms > 5000 {
            return Err("computer_delay_ms must not exceed 5000".to_string());
        }
        if self.scores_file.trim().is_empty() {
            return Err("scores_file must not be empty".to_string());
        }
        if self.x_name.chars().count() > 32 || self.o_name.chars().count() > 32 {
            return Err("player names must not exceed 32 characters".to_string());
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            x_name: "Player X".to_string(),
            o_name: "Player O".to_string(),
            difficulty: Difficulty::Hard,
            computer_delay_ms: 400,
            scores_file: "xo_scores.yaml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_temp_file_path() -> String {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_xo_client_config_{}.yaml", random_number));
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = get_temp_file_path();
        let config = ClientConfig {
            x_name: "Ana".to_string(),
            difficulty: Difficulty::Easy,
            ..ClientConfig::default()
        };

        get_config_manager(&path).set_config(&config).unwrap();
        let loaded = get_config_manager(&path).get_config().unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_rejects_slow_computer() {
        let config = ClientConfig {
            computer_delay_ms: 60_000,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
