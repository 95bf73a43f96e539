use crate::error::DlaError;
use crate::settings::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete run configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Grid side length
    pub size: usize,
    /// Particles to deposit per run
    pub particles: usize,
    /// All simulation settings
    pub settings: SimulationSettings,
}

impl AppConfig {
    /// Default location: `<config dir>/dla-aggregate/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dla-aggregate").join("config.json"))
    }

    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), DlaError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, DlaError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DlaError> {
        if self.size == 0 {
            return Err(DlaError::InvalidConfig("grid size must be positive".into()));
        }
        self.settings.validate()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            size: 400,
            particles: 5000,
            settings: SimulationSettings::default(),
        }
    }
}
