use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracker_core::{Anchor, TrackerError, Window};

/// Root configuration structure parsed from `tracker.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Directory holding one `<channel-id>.csv` file per tracked channel.
    pub data_dir: PathBuf,
    /// Channels sampled by `tracker collect`.
    pub channels: Vec<ChannelConfig>,
    /// Upstream API and scheduling settings.
    pub collect: CollectConfig,
    /// Default dashboard settings.
    pub report: ReportConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            channels: Vec::new(),
            collect:  CollectConfig::default(),
            report:   ReportConfig::default(),
        }
    }
}

/// One tracked channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel handle, with or without the leading `@`.
    pub handle: String,
    /// Optional display name for log output.
    #[serde(default)]
    pub name: Option<String>,
}

impl ChannelConfig {
    pub fn new(handle: impl Into<String>) -> Self {
        Self { handle: handle.into(), name: None }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.handle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectConfig {
    /// Environment variable holding the API key. The key itself is never
    /// stored in the config file.
    pub api_key_env: String,
    /// Base URL of the YouTube Data API.
    pub api_base: String,
    /// Seconds between runs in `collect --daemon` mode.
    pub interval_secs: u64,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            api_key_env:   "YOUTUBE_API_KEY".to_string(),
            api_base:      "https://www.googleapis.com/youtube/v3".to_string(),
            interval_secs: 24 * 60 * 60,
        }
    }
}

impl CollectConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, TrackerError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(TrackerError::Config(format!(
                "environment variable {} is not set",
                self.api_key_env
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Display period: `"all"` or a day count such as `"7"` / `"30d"`.
    pub period: Window,
    /// `"wall-clock"` (default) or `"latest-sample"`.
    pub anchor: Anchor,
}
