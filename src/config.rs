//! Persisted scheduler settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{BarTiming, BlockTiming, CollisionPolicy, SlotGrid};
use crate::error::ConfigError;
use crate::model::clock::ClockTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Opening time of the slot grid, `"HH:MM"`.
    pub grid_start: String,
    /// Closing time of the slot grid, `"HH:MM"`.
    pub grid_end: String,
    pub slot_minutes: u32,
    /// Pixel height of one slot.
    pub slot_height: f32,
    pub block_arm_delay_ms: u64,
    pub bar_arm_delay_ms: u64,
    pub click_suppress_ms: u64,
    /// Pixel width of one day on the Gantt timeline.
    pub day_width: f32,
    pub bar_margin: f32,
    /// Grab size of block and bar resize handles, in pixels.
    pub handle_size: f32,
    pub collision_policy: CollisionPolicy,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            grid_start: "09:00".into(),
            grid_end: "18:00".into(),
            slot_minutes: 30,
            slot_height: 28.0,
            block_arm_delay_ms: 150,
            bar_arm_delay_ms: 300,
            click_suppress_ms: 100,
            day_width: 60.0,
            bar_margin: 4.0,
            handle_size: 6.0,
            collision_policy: CollisionPolicy::MoveOnly,
        }
    }
}

impl SchedulerSettings {
    /// `settings.json` under the platform config directory, or the working
    /// directory if none can be determined.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "TimeblockBoard")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .unwrap_or_else(|| PathBuf::from("settings.json"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let settings: SchedulerSettings = serde_json::from_str(&text)?;
        settings.validate()?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load from `path`; a missing file silently gives the defaults, an
    /// unreadable or invalid one gives the defaults with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring settings file; using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let start: ClockTime = self.grid_start.parse()?;
        let end: ClockTime = self.grid_end.parse()?;
        if end <= start {
            return Err(ConfigError::Invalid(format!(
                "grid_end {end} must be after grid_start {start}"
            )));
        }
        if self.slot_minutes == 0 {
            return Err(ConfigError::Invalid("slot_minutes must be positive".into()));
        }
        if (end.minutes() - start.minutes()) % self.slot_minutes != 0 {
            return Err(ConfigError::Invalid(format!(
                "{start}–{end} is not a whole number of {}-minute slots",
                self.slot_minutes
            )));
        }
        for (name, value) in [
            ("slot_height", self.slot_height),
            ("day_width", self.day_width),
            ("handle_size", self.handle_size),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if self.bar_margin < 0.0 || self.bar_margin >= self.day_width {
            return Err(ConfigError::Invalid(
                "bar_margin must be between 0 and day_width".into(),
            ));
        }
        Ok(())
    }

    pub fn slot_grid(&self) -> Result<SlotGrid, ConfigError> {
        self.validate()?;
        Ok(SlotGrid {
            start: self.grid_start.parse()?,
            end: self.grid_end.parse()?,
            slot_minutes: self.slot_minutes,
            slot_height: self.slot_height,
        })
    }

    pub fn block_timing(&self) -> BlockTiming {
        BlockTiming {
            arm_delay: self.block_arm_delay_ms as f64 / 1000.0,
            policy: self.collision_policy,
        }
    }

    pub fn bar_timing(&self) -> BarTiming {
        BarTiming {
            arm_delay: self.bar_arm_delay_ms as f64 / 1000.0,
            click_suppress: self.click_suppress_ms as f64 / 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let settings = SchedulerSettings::default();
        settings.validate().unwrap();
        let grid = settings.slot_grid().unwrap();
        assert_eq!(grid.slot_count(), 18);
        assert_eq!(settings.block_timing().arm_delay, 0.15);
        assert_eq!(settings.bar_timing().arm_delay, 0.3);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.json");
        let settings = SchedulerSettings {
            grid_start: "08:00".into(),
            collision_policy: CollisionPolicy::Uniform,
            ..SchedulerSettings::default()
        };
        settings.save(&path).expect("save");
        let loaded = SchedulerSettings::load(&path).expect("load");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "day_width": 40.0, "collision_policy": "uniform" }"#).unwrap();
        let loaded = SchedulerSettings::load(&path).expect("load");
        assert_eq!(loaded.day_width, 40.0);
        assert_eq!(loaded.collision_policy, CollisionPolicy::Uniform);
        assert_eq!(loaded.grid_end, "18:00");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let bad_order = SchedulerSettings {
            grid_start: "18:00".into(),
            grid_end: "09:00".into(),
            ..SchedulerSettings::default()
        };
        assert!(matches!(bad_order.validate(), Err(ConfigError::Invalid(_))));

        let uneven = SchedulerSettings {
            slot_minutes: 25,
            ..SchedulerSettings::default()
        };
        assert!(uneven.validate().is_err());

        let malformed = SchedulerSettings {
            grid_start: "9am".into(),
            ..SchedulerSettings::default()
        };
        assert!(malformed.validate().is_err());
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("missing.json");
        assert_eq!(SchedulerSettings::load_or_default(&missing), SchedulerSettings::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert_eq!(SchedulerSettings::load_or_default(&broken), SchedulerSettings::default());
    }
}
