pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

pub use schema::{BarConfig, ConfigMessage};

use crate::feed::Units;

const STRING_KEYS: &[&str] = &["nightscout_url", "access_token", "units"];
const BOOL_KEYS: &[&str] = &[
    "show_loop_data",
    "show_update_time",
    "show_bg_difference",
    "legacy_status_item",
];
const INTEGER_KEYS: &[&str] = &[
    "stale_threshold_min",
    "refresh_interval_secs",
    "request_timeout_secs",
];

/// Return the platform-specific config file path
/// (~/.config/nightscout-bar/config.toml on Linux).
pub fn default_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("nightscout-bar").join("config.toml"))
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))
}

/// Use the explicit path if one was given, otherwise the default location.
pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_path(),
    }
}

/// Load and validate the config file. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<BarConfig> {
    let config: BarConfig = if path.exists() {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?
    } else {
        BarConfig::default()
    };

    for msg in config.validate() {
        match msg {
            ConfigMessage::Warning(w) => warn!("config warning: {}", w),
            ConfigMessage::Error(e) => {
                anyhow::bail!("config error in {}: {}", path.display(), e);
            }
        }
    }

    Ok(config)
}

/// Set a single key in the config file, preserving comments and layout.
/// The file and its parent directory are created if missing.
pub fn set_value(path: &Path, key: &str, value: &str) -> Result<()> {
    let item = if STRING_KEYS.contains(&key) {
        if key == "units" {
            value.parse::<Units>().map_err(anyhow::Error::msg)?;
        }
        toml_edit::value(value)
    } else if BOOL_KEYS.contains(&key) {
        let b: bool = value
            .parse()
            .with_context(|| format!("{} expects true or false", key))?;
        toml_edit::value(b)
    } else if INTEGER_KEYS.contains(&key) {
        let n: i64 = value
            .parse()
            .with_context(|| format!("{} expects a whole number", key))?;
        toml_edit::value(n)
    } else {
        anyhow::bail!("unknown config key '{}'", key);
    };

    let content = if path.exists() {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        String::new()
    };
    let mut doc: toml_edit::DocumentMut = content
        .parse()
        .with_context(|| format!("failed to parse {} for editing", path.display()))?;
    doc[key] = item;

    let updated = doc.to_string();
    let parsed: BarConfig = toml::from_str(&updated).context("edited config is not valid")?;
    if let Some(ConfigMessage::Error(e)) = parsed
        .validate()
        .into_iter()
        .find(|m| matches!(m, ConfigMessage::Error(_)))
    {
        anyhow::bail!("refusing to write config: {}", e);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, updated).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, BarConfig::default());
        assert_eq!(config.stale_threshold_min, 15);
        assert_eq!(config.refresh_interval_secs, 60);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "nightscout_url = \"https://cgm.example.org\"\nunits = \"mmol\"\nshow_bg_difference = true\n",
        )
        .unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.nightscout_url, "https://cgm.example.org");
        assert_eq!(config.units, Units::Mmol);
        assert!(config.show_bg_difference);
        assert!(!config.show_loop_data);
    }

    #[test]
    fn test_invalid_url_fails_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "nightscout_url = \"cgm.example.org\"\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_unknown_units_fails_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "units = \"mg\"\n").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_validate_zero_interval() {
        let config = BarConfig {
            refresh_interval_secs: 0,
            ..Default::default()
        };
        assert!(config
            .validate()
            .iter()
            .any(|m| matches!(m, ConfigMessage::Error(e) if e.contains("refresh_interval_secs"))));
    }

    #[test]
    fn test_set_value_preserves_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# my site\nnightscout_url = \"https://a.example.org\"\n").unwrap();

        set_value(&path, "show_loop_data", "true").unwrap();
        set_value(&path, "units", "mmol").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# my site"));
        let config = load(&path).unwrap();
        assert!(config.show_loop_data);
        assert_eq!(config.units, Units::Mmol);
    }

    #[test]
    fn test_set_value_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        set_value(&path, "stale_threshold_min", "20").unwrap();
        assert_eq!(load(&path).unwrap().stale_threshold_min, 20);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        assert!(set_value(&path, "colour", "red").is_err());
        assert!(set_value(&path, "show_loop_data", "yes").is_err());
        assert!(set_value(&path, "units", "mg").is_err());
        assert!(set_value(&path, "nightscout_url", "ftp://x").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_masked_token() {
        let mut config = BarConfig::default();
        assert_eq!(config.masked_token(), "");
        config.access_token = "abc".into();
        assert_eq!(config.masked_token(), "****");
        config.access_token = "reader-1f2e3d".into();
        assert_eq!(config.masked_token(), "****2e3d");
    }
}
