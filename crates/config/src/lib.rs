pub mod schema;

pub use schema::{ChannelConfig, CollectConfig, ReportConfig, TrackerConfig};

use std::path::{Path, PathBuf};
use tracker_core::{Result, TrackerError};

/// Load configuration from a TOML file.
///
/// A missing file yields `TrackerConfig::default()`: reporting works on an
/// existing data directory, but `collect` has no channels until the file lists
/// some under `[[channels]]`.
pub fn load(path: impl AsRef<Path>) -> Result<TrackerConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults (data_dir = \"data\", no channels). \
             Add [[channels]] entries with a `handle` to collect samples.",
            path.display()
        );
        return Ok(TrackerConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| TrackerError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config = parse(&raw)?;
    if config.channels.is_empty() {
        tracing::warn!("'{}' has no [[channels]]; collect will sample nothing", path.display());
    }
    Ok(config)
}

/// Parse configuration from TOML text.
///
/// Every `[[channels]]` entry needs a non-blank `handle`.
pub fn parse(raw: &str) -> Result<TrackerConfig> {
    let config: TrackerConfig =
        toml::from_str(raw).map_err(|e| TrackerError::Config(format!("TOML parse error: {e}")))?;

    if let Some(index) = config
        .channels
        .iter()
        .position(|c| c.handle.trim().trim_start_matches('@').is_empty())
    {
        return Err(TrackerError::Config(format!(
            "channels[{index}]: handle must not be empty"
        )));
    }
    Ok(config)
}

/// Config path used when `--config` is not given: `$TRACKER_CONFIG` if set,
/// otherwise `tracker/tracker.toml` under `$XDG_CONFIG_HOME` (or `~/.config`).
pub fn default_path() -> PathBuf {
    if let Some(path) = std::env::var_os("TRACKER_CONFIG").filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = std::env::var_os("HOME").unwrap_or_else(|| ".".into());
            PathBuf::from(home).join(".config")
        });
    base.join("tracker").join("tracker.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::{Anchor, Window};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert!(cfg.channels.is_empty());
        assert_eq!(cfg.report.period, Window::All);
        assert_eq!(cfg.collect.api_key_env, "YOUTUBE_API_KEY");
    }

    #[test]
    fn parses_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/var/lib/tracker"

[[channels]]
handle = "@first"
name   = "First"

[[channels]]
handle = "second"

[collect]
interval_secs = 3600

[report]
period = "30"
anchor = "latest-sample"
"#,
        )
        .unwrap();

        let cfg = load(&path).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/tracker"));
        assert_eq!(cfg.channels.len(), 2);
        assert_eq!(cfg.channels[0].display_name(), "First");
        assert_eq!(cfg.channels[1].display_name(), "second");
        assert_eq!(cfg.collect.interval_secs, 3600);
        assert_eq!(cfg.collect.api_base, "https://www.googleapis.com/youtube/v3");
        assert_eq!(cfg.report.period, Window::MONTH);
        assert_eq!(cfg.report.anchor, Anchor::LatestSample);
    }

    #[test]
    fn rejects_bad_period() {
        let err = parse("[report]\nperiod = \"fortnight\"\n").unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }

    #[test]
    fn rejects_blank_channel_handle() {
        let err = parse("[[channels]]\nhandle = \"@first\"\n\n[[channels]]\nhandle = \" @ \"\n")
            .unwrap_err();
        match err {
            TrackerError::Config(msg) => assert!(msg.contains("channels[1]")),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn file_without_channels_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.toml");
        std::fs::write(&path, "data_dir = \"samples\"\n").unwrap();

        let cfg = load(&path).unwrap();
        assert!(cfg.channels.is_empty());
        assert_eq!(cfg.data_dir, PathBuf::from("samples"));
    }

    #[test]
    fn tracker_config_env_overrides_default_path() {
        std::env::set_var("TRACKER_CONFIG", "/etc/tracker/custom.toml");
        let path = default_path();
        std::env::remove_var("TRACKER_CONFIG");
        assert_eq!(path, PathBuf::from("/etc/tracker/custom.toml"));
        assert!(default_path().ends_with("tracker/tracker.toml"));
    }

    #[test]
    fn api_key_requires_env_var() {
        let cfg = CollectConfig {
            api_key_env: "TRACKER_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..CollectConfig::default()
        };
        assert!(cfg.api_key().is_err());
    }
}
