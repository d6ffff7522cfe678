// Clock configuration - Serializable tuning knobs for the scheduler
// Read from RON or JSON, the same pair used for project files

use crate::error::{MidiError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Initial tempo
    pub beats_per_minute: f32,
    /// Longest single idle wait of the timing thread, in milliseconds
    pub max_sleep_ms: u64,
    /// Drop undispatched messages when the clock stops
    pub discard_pending_on_stop: bool,
    /// Lateness (in beats) above which a dispatch is logged as a warning
    pub late_warning_beats: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            beats_per_minute: 120.0,
            max_sleep_ms: 10,
            discard_pending_on_stop: false,
            late_warning_beats: 0.25,
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.beats_per_minute.is_finite() || self.beats_per_minute <= 0.0 {
            return Err(MidiError::Config(format!(
                "beats_per_minute must be positive, got {}",
                self.beats_per_minute
            )));
        }
        if self.max_sleep_ms == 0 {
            return Err(MidiError::Config("max_sleep_ms must be at least 1".to_string()));
        }
        if self.late_warning_beats.is_nan() || self.late_warning_beats < 0.0 {
            return Err(MidiError::Config(format!(
                "late_warning_beats must be non-negative, got {}",
                self.late_warning_beats
            )));
        }
        Ok(())
    }

    pub fn from_ron_str(data: &str) -> Result<Self> {
        let config: ClockConfig = ron::from_str(data).map_err(|e| {
            MidiError::Config(format!("Failed to deserialize from RON: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let config: ClockConfig = serde_json::from_str(data).map_err(|e| {
            MidiError::Config(format!("Failed to deserialize from JSON: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| MidiError::Config(format!("Failed to serialize to RON: {}", e)))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MidiError::Config(format!("Failed to serialize to JSON: {}", e)))
    }

    /// Loads a `.ron` or `.json` file, chosen by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron_str(&data),
            Some("json") => Self::from_json_str(&data),
            _ => Err(MidiError::Config(format!(
                "Unsupported config file extension: {}",
                path.display()
            ))),
        }
    }

    /// Writes the config as `.ron` or `.json`, chosen by extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => self.to_ron_string()?,
            Some("json") => self.to_json_string()?,
            _ => {
                return Err(MidiError::Config(format!(
                    "Unsupported config file extension: {}",
                    path.display()
                )));
            }
        };
        std::fs::write(path, data)?;
        Ok(())
    }
}
