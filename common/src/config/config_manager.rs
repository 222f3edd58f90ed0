use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

/// Loads a config once, caches it, and writes changes back through the provider.
///
/// A provider with no content yields `TConfig::default()` without caching it, so
/// a file created later is still picked up.
pub struct ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_serializer: TConfigSerializer,
    config_content_provider: TConfigContentProvider,
    config: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(FileContentConfigProvider::new(file_path), YamlConfigSerializer::new())
    }
}

impl<TConfigContentProvider, TConfig, TConfigSerializer>
    ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(
        config_content_provider: TConfigContentProvider,
        config_serializer: TConfigSerializer,
    ) -> Self {
        Self {
            config: Arc::new(Mutex::new(None)),
            config_content_provider,
            config_serializer,
        }
    }

    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config lock poisoned".to_string())?;

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        if let Some(config_data) = self.config_content_provider.get_config_content()? {
            let config = self.config_serializer.deserialize(&config_data)?;

            config
                .validate()
                .map_err(|e| format!("Config validation error: {}", e))?;

            *current = Some(config.clone());
            return Ok(config);
        }

        Ok(TConfig::default())
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let serialized_config = self.config_serializer.serialize(config)?;

        self.config_content_provider
            .set_config_content(&serialized_config)?;

        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config lock poisoned".to_string())?;
        *current = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryContentConfigProvider;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct SampleConfig {
        name: String,
        limit: u32,
    }

    impl Default for SampleConfig {
        fn default() -> Self {
            Self {
                name: "default".to_string(),
                limit: 3,
            }
        }
    }

    impl Validate for SampleConfig {
        fn validate(&self) -> Result<(), String> {
            if self.limit == 0 {
                return Err("limit must be greater than 0".to_string());
            }
            Ok(())
        }
    }

    fn get_temp_file_path() -> String {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_xo_config_{}.yaml", random_number));
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_missing_content_yields_default() {
        let manager: ConfigManager<_, SampleConfig> =
            ConfigManager::new(MemoryContentConfigProvider::default(), YamlConfigSerializer::new());
        assert_eq!(manager.get_config().unwrap(), SampleConfig::default());
    }

    #[test]
    fn test_invalid_content_is_rejected() {
        let provider = MemoryContentConfigProvider::new(Some("name: x\nlimit: 0\n".to_string()));
        let manager: ConfigManager<_, SampleConfig> =
            ConfigManager::new(provider, YamlConfigSerializer::new());
        let err = manager.get_config().unwrap_err();
        assert!(err.contains("limit must be greater than 0"));
    }

    #[test]
    fn test_set_config_refuses_invalid_values() {
        let provider = MemoryContentConfigProvider::default();
        let manager: ConfigManager<_, SampleConfig> =
            ConfigManager::new(provider.clone(), YamlConfigSerializer::new());
        let bad = SampleConfig {
            name: "bad".to_string(),
            limit: 0,
        };
        assert!(manager.set_config(&bad).is_err());
        assert_eq!(provider.get_config_content().unwrap(), None);
    }

    #[test]
    fn test_file_round_trip() {
        let path = get_temp_file_path();
        let config = SampleConfig {
            name: "saved".to_string(),
            limit: 9,
        };

        let manager: ConfigManager<_, SampleConfig> = ConfigManager::from_yaml_file(&path);
        manager.set_config(&config).unwrap();

        let reloaded: ConfigManager<_, SampleConfig> = ConfigManager::from_yaml_file(&path);
        assert_eq!(reloaded.get_config().unwrap(), config);

        std::fs::remove_file(&path).unwrap();
    }
}
