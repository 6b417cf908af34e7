//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$INVITECOPY_CONFIG` (environment variable)
//! 2. `~/.config/invitecopy/config.toml` (Linux/macOS)
//!    `%APPDATA%\invitecopy\config.toml` (Windows)
//! 3. Built-in defaults

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::theme::ThemeState;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Theme detection inputs for the local host.
    pub display: DisplayConfig,
    /// Toolbar icon assets.
    pub icons: IconsConfig,
    /// Where copied summaries go.
    pub clipboard: ClipboardConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Theme detection inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Whether the OS prefers a dark colour scheme. Unset: guessed from
    /// `COLORFGBG`.
    pub prefers_dark: Option<bool>,
    /// Colour overrides of the host theme. Unset means the host default theme.
    pub theme_colors: Option<BTreeMap<String, String>>,
}

/// Toolbar icon asset paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconsConfig {
    /// Icon for dark toolbars.
    pub dark: String,
    /// Icon for bright toolbars.
    pub bright: String,
}

/// Clipboard output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// How to reach the clipboard.
    pub backend: ClipboardBackend,
    /// Program and arguments receiving the text on stdin (`command` backend),
    /// e.g. `["wl-copy"]` or `["xclip", "-selection", "clipboard"]`.
    pub command: Vec<String>,
}

/// Clipboard transport of the local host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardBackend {
    /// OSC 52 terminal escape written to stdout.
    Osc52,
    /// External program fed through stdin.
    Command,
    /// Plain text on stdout.
    Stdout,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            dark: ThemeState::Dark.default_icon().to_string(),
            bright: ThemeState::Bright.default_icon().to_string(),
        }
    }
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            backend: ClipboardBackend::Osc52,
            command: Vec::new(),
        }
    }
}

impl IconsConfig {
    /// Icon path for a theme variant.
    pub fn path_for(&self, theme: ThemeState) -> &str {
        match theme {
            ThemeState::Dark => &self.dark,
            ThemeState::Bright => &self.bright,
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Save configuration to the standard location.
pub fn save_config(config: &Config) -> anyhow::Result<()> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("INVITECOPY_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("invitecopy").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invitecopy")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("invitecopy.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(cfg.display.prefers_dark, None);
        assert!(cfg.display.theme_colors.is_none());
        assert_eq!(cfg.icons.dark, "images/calendar_white.png");
        assert_eq!(cfg.icons.bright, "images/calendar_black.png");
        assert_eq!(cfg.clipboard.backend, ClipboardBackend::Osc52);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r##"
[display]
prefers_dark = true

[display.theme_colors]
frame = "#1c1b22"

[clipboard]
backend = "command"
command = ["wl-copy"]
"##;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.display.prefers_dark, Some(true));
        assert_eq!(
            cfg.display
                .theme_colors
                .as_ref()
                .and_then(|c| c.get("frame"))
                .map(String::as_str),
            Some("#1c1b22")
        );
        assert_eq!(cfg.clipboard.backend, ClipboardBackend::Command);
        assert_eq!(cfg.clipboard.command, vec!["wl-copy".to_string()]);
        // Other fields use defaults
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(cfg.icons, IconsConfig::default());
    }

    #[test]
    fn test_icon_path_for_theme() {
        let icons = IconsConfig {
            dark: "white.png".into(),
            bright: "black.png".into(),
        };
        assert_eq!(icons.path_for(ThemeState::Dark), "white.png");
        assert_eq!(icons.path_for(ThemeState::Bright), "black.png");
    }

    #[test]
    fn test_log_file_in_cache_dir_override() {
        let mut cfg = Config::default();
        cfg.general.cache_dir = Some(PathBuf::from("/tmp/invitecopy-test"));
        assert_eq!(
            log_file_path(&cfg),
            PathBuf::from("/tmp/invitecopy-test/invitecopy.log")
        );
    }
}
