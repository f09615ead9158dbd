//! Configuration – reads/writes `~/.oritrack/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted user configuration stored in `~/.oritrack/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote coordinate sink.
    #[serde(default = "default_sink_url")]
    pub sink_url: String,

    /// Nominal sensor sampling interval in milliseconds.
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,

    /// Smoothing coefficient for the orientation filter (0–1).
    #[serde(default = "default_smoothing_rate")]
    pub smoothing_rate: f32,
}

fn default_sink_url() -> String {
    "http://localhost:8780".to_string()
}
fn default_sample_interval_ms() -> u64 {
    500
}
fn default_smoothing_rate() -> f32 {
    0.8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sink_url: default_sink_url(),
            sample_interval_ms: default_sample_interval_ms(),
            smoothing_rate: default_smoothing_rate(),
        }
    }
}

/// Return the path to `~/.oritrack/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".oritrack").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `ORITRACK_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `ORITRACK_SINK_URL` | `sink_url` |
/// | `ORITRACK_SAMPLE_INTERVAL_MS` | `sample_interval_ms` |
/// | `ORITRACK_SMOOTHING_RATE` | `smoothing_rate` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("ORITRACK_SINK_URL") {
        cfg.sink_url = v;
    }
    if let Ok(v) = std::env::var("ORITRACK_SAMPLE_INTERVAL_MS")
        && let Ok(interval) = v.parse::<u64>()
    {
        cfg.sample_interval_ms = interval;
    }
    if let Ok(v) = std::env::var("ORITRACK_SMOOTHING_RATE")
        && let Ok(rate) = v.parse::<f32>()
    {
        cfg.smoothing_rate = rate;
    }
}

/// Save the config to disk, creating `~/.oritrack/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}
