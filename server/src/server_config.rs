use std::time::Duration;

use serde::{Deserialize, Serialize};

use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::games::tictactoe::Difficulty;

pub const DEFAULT_CONFIG_FILE: &str = "xo_server_config.yaml";

pub fn get_config_manager(
    path: &str,
) -> ConfigManager<FileContentConfigProvider, ServerConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub static_dir: String,
    pub default_difficulty: Difficulty,
    pub chat: ChatConfig,
    pub cleanup: CleanupConfig,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct ChatConfig {
    pub max_message_length: usize,
    pub max_history: usize,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct CleanupConfig {
    pub check_interval_secs: u64,
    pub inactivity_timeout_secs: u64,
}

impl CleanupConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bind_address.trim().is_empty() {
            return Err("bind_address must not be empty".to_string());
        }
        if self.static_dir.trim().is_empty() {
            return Err("static_dir must not be empty".to_string());
        }
        self.chat.validate()?;
        self.cleanup.validate()?;
        Ok(())
    }
}

impl Validate for ChatConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_message_length == 0 {
            return Err("chat.max_message_length must be greater than 0".to_string());
        }
        if self.max_message_length > 2000 {
            return Err("chat.max_message_length must not exceed 2000".to_string());
        }
        if self.max_history == 0 {
            return Err("chat.max_history must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for CleanupConfig {
    fn validate(&self) -> Result<(), String> {
        if self.check_interval_secs == 0 {
            return Err("cleanup.check_interval_secs must be greater than 0".to_string());
        }
        if self.inactivity_timeout_secs < self.check_interval_secs {
            return Err(
                "cleanup.inactivity_timeout_secs must be at least check_interval_secs".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            static_dir: "web".to_string(),
            default_difficulty: Difficulty::Hard,
            chat: ChatConfig::default(),
            cleanup: CleanupConfig {
                check_interval_secs: 300,
                inactivity_timeout_secs: 3600,
            },
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: 200,
            max_history: 100,
        }
    }
}
