// Configuration store: resolves the settings file, loads it, and runs the
// first-run interactive setup when no file exists. Settings are read once
// per process and passed by value to everything else.

use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "TALLY_CONFIG";

const SETTINGS_FILE: &str = "settings.toml";

/// Connection settings for the time-tracking server. Loaded once and
/// immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServerSettings {
    pub url: String,
    pub username: String,
    pub api_token: String,
}

/// Optional settings for the argos/status-bar output modes: the command
/// the widget should invoke, and how long the button line may be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSettings {
    pub command: String,
    pub button_length: usize,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        WidgetSettings {
            command: "tally".into(),
            button_length: 10,
        }
    }
}

/// Full settings file contents: a `[server]` table plus an optional
/// `[widget]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub widget: WidgetSettings,
}

impl Settings {
    /// Find an existing settings file. Checked in order: the
    /// `TALLY_CONFIG` environment variable, the platform config
    /// directory, the directory next to the executable, and the current
    /// directory. First existing file wins.
    pub fn find_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.is_file() {
                debug!(?path, "settings found via {CONFIG_ENV_VAR}");
                return Some(path);
            }
            debug!(?path, "{CONFIG_ENV_VAR} set but file does not exist");
        }

        let mut candidates = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("tally").join(SETTINGS_FILE));
        }
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join(SETTINGS_FILE));
            }
        }
        candidates.push(PathBuf::from(SETTINGS_FILE));

        candidates.into_iter().find(|p| p.is_file())
    }

    /// Default location used when writing a fresh settings file.
    pub fn default_file() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tally")
            .join(SETTINGS_FILE)
    }

    /// Load settings from an existing file.
    pub fn load(path: &std::path::Path) -> Result<Settings> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, data)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }

    /// Load settings if a file exists, otherwise run the interactive
    /// first-run setup and persist the result.
    pub fn load_or_init() -> Result<Settings> {
        match Self::find_file() {
            Some(path) => {
                debug!(?path, "loading settings");
                Self::load(&path)
            }
            None => {
                println!("No settings file found");
                Self::interactive_setup()
            }
        }
    }

    /// Ask for server URL, username and API token, then save the result
    /// to the default location.
    fn interactive_setup() -> Result<Settings> {
        let url: String = Input::new()
            .with_prompt("Server url")
            .interact_text()
            .context("Failed to read server url")?;
        let username: String = Input::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?;
        let api_token: String = Password::new()
            .with_prompt("API token")
            .interact()
            .context("Failed to read API token")?;

        let settings = Settings {
            server: ServerSettings {
                url,
                username,
                api_token,
            },
            widget: WidgetSettings::default(),
        };

        let path = Self::default_file();
        settings.save(&path)?;
        println!("Settings saved to {}", path.display());
        Ok(settings)
    }
}
