use serde::Deserialize;

use crate::queue::LoopMode;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/wavesync/config.toml` or
/// `~/.config/wavesync/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `WAVESYNC__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub seek: SeekSettings,
    pub queue: QueueSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial global volume, 0–100.
    pub volume: u8,
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Default repeat mode.
    pub loop_mode: LoopModeSetting,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 50,
            shuffle: false,
            loop_mode: LoopModeSetting::NoLoop,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeekSettings {
    /// Delay before a seek intent reaches the device (milliseconds). Rapid
    /// intents within this window coalesce into one device seek.
    pub debounce_ms: u64,
    /// How long `is_seeking` stays held after the device seek was issued
    /// when no confirmation arrives (milliseconds).
    pub grace_ms: u64,
    /// Seek intents closer than this to the current position are ignored
    /// (seconds).
    pub min_delta_secs: f64,
}

impl Default for SeekSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            grace_ms: 300,
            min_delta_secs: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    /// Page size requested from listing endpoints when loading a queue.
    pub page_size: usize,
    /// Sort order requested from listing endpoints.
    pub sort: String,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            page_size: 100,
            sort: "-createdAt".to_string(),
        }
    }
}

/// Serde-friendly spelling of [`LoopMode`] for config files.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopModeSetting {
    #[serde(alias = "no_loop", alias = "none")]
    NoLoop,
    #[serde(alias = "loop_all", alias = "all", alias = "repeat-all")]
    LoopAll,
    #[serde(alias = "loop_one", alias = "one", alias = "repeat-one")]
    LoopOne,
}

impl From<LoopModeSetting> for LoopMode {
    fn from(setting: LoopModeSetting) -> Self {
        match setting {
            LoopModeSetting::NoLoop => LoopMode::NoLoop,
            LoopModeSetting::LoopAll => LoopMode::LoopAll,
            LoopModeSetting::LoopOne => LoopMode::LoopOne,
        }
    }
}
