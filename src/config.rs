//! Persisted viewer settings (lives in the OS config directory).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::{ItemStatus, Preset};

/// Zone used for calendar boundaries when none (or a bad one) is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Copenhagen;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// IANA zone for all calendar math (midnights, week starts, months).
    pub timezone: String,
    pub visible_statuses: Vec<ItemStatus>,
    /// Hide unrelated bars while a relation is highlighted instead of dimming them.
    pub highlight_hides_unrelated: bool,
    pub row_height: f64,
    pub overscan: usize,
    pub hover_grace_ms: u64,
    pub viewport_debounce_ms: u64,
    pub default_preset: Preset,
    /// Reopened on startup when present.
    pub last_schedule: Option<PathBuf>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.name().to_string(),
            visible_statuses: ItemStatus::ALL.to_vec(),
            highlight_hides_unrelated: false,
            row_height: 30.0,
            overscan: 6,
            hover_grace_ms: 100,
            viewport_debounce_ms: 40,
            default_preset: Preset::default(),
            last_schedule: None,
        }
    }
}

impl TimelineConfig {
    /// Resolve the configured zone, falling back to the default.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(err) => {
                tracing::warn!(timezone = %self.timezone, %err, "unknown timezone, using default");
                DEFAULT_TIMEZONE
            }
        }
    }

    pub fn visible_set(&self) -> HashSet<ItemStatus> {
        self.visible_statuses.iter().copied().collect()
    }

    pub fn hover_grace(&self) -> Duration {
        Duration::from_millis(self.hover_grace_ms)
    }

    pub fn viewport_debounce(&self) -> Duration {
        Duration::from_millis(self.viewport_debounce_ms)
    }

    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "MachineGantt") {
            proj_dirs.config_dir().join("settings.json")
        } else {
            PathBuf::from(".").join("settings.json")
        }
    }

    /// Load from the OS config directory; missing or broken files yield defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        self.save_to(&Self::config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(dir) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(dir) {
                tracing::warn!(dir = %dir.display(), %err, "failed to create settings directory");
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    tracing::warn!(path = %path.display(), %err, "failed to save settings");
                }
            }
            Err(err) => tracing::warn!(%err, "failed to serialize settings"),
        }
    }
}
