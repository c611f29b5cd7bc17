//! Configuration loading for ConcealBot.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Get the ConcealBot home directory (~/.concealbot).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".concealbot"))
}

/// Get the settings file path.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("settings.json"))
}

/// Get the embed database path.
pub fn get_db_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("data").join("embeds.db"))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Public hostname used when building embed links.
    pub hostname: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 8080,
        }
    }
}

/// One entry of the ordered location -> IANA zone mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneEntry {
    pub label: String,
    pub zone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub timezones: Vec<TimezoneEntry>,
}

impl Settings {
    /// Resolve the bot token, preferring settings over environment.
    pub fn bot_token(&self) -> Result<String> {
        if let Some(token) = self.telegram.bot_token.as_deref() {
            if !token.trim().is_empty() {
                return Ok(token.to_string());
            }
        }
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            if !token.trim().is_empty() {
                return Ok(token);
            }
        }
        Err(Error::Config(
            "No bot token configured. Set telegram.bot_token in settings.json or export BOT_TOKEN."
                .to_string(),
        ))
    }
}

fn default_timezones() -> Vec<TimezoneEntry> {
    vec![
        TimezoneEntry {
            label: "New Jersey/Philadelphia".to_string(),
            zone: "America/New_York".to_string(),
        },
        TimezoneEntry {
            label: "Chile".to_string(),
            zone: "America/Santiago".to_string(),
        },
        TimezoneEntry {
            label: "Zimbabwe".to_string(),
            zone: "Africa/Harare".to_string(),
        },
    ]
}

/// In-memory defaults, used by offline commands when no settings file exists.
pub fn default_settings() -> Settings {
    Settings {
        timezones: default_timezones(),
        ..Default::default()
    }
}

/// Load settings from ~/.concealbot/settings.json
pub fn load_settings() -> Result<Settings> {
    let path = get_settings_path()?;

    if !path.exists() {
        return Err(Error::Config(format!(
            "Settings file not found at {}. Run 'concealbot setup' first.",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(&path)?;
    let mut settings: Settings = serde_json::from_str(&content)?;

    // Self-heal installs that predate the timezone list.
    if ensure_defaults(&mut settings) {
        let updated = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&path, updated)?;
        tracing::info!("Applied default timezone provisioning to {}", path.display());
    }

    validate_settings(&settings)?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Write settings, creating the home directory if needed.
pub fn save_settings(settings: &Settings) -> Result<()> {
    let path = get_settings_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(settings)?)?;
    Ok(())
}

/// Create a default settings file if none exists. Returns the path.
pub fn init_default_settings() -> Result<PathBuf> {
    let path = get_settings_path()?;
    if path.exists() {
        return Ok(path);
    }
    let settings = Settings {
        timezones: default_timezones(),
        ..Default::default()
    };
    save_settings(&settings)?;
    Ok(path)
}

fn ensure_defaults(settings: &mut Settings) -> bool {
    let mut changed = false;

    if settings.timezones.is_empty() {
        settings.timezones = default_timezones();
        changed = true;
    }

    if settings.web.hostname.trim().is_empty() {
        settings.web.hostname = WebConfig::default().hostname;
        changed = true;
    }

    changed
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.web.port == 0 {
        return Err(Error::Config("web.port must be nonzero".to_string()));
    }

    let mut seen = std::collections::HashSet::new();
    for entry in &settings.timezones {
        if !seen.insert(entry.label.as_str()) {
            return Err(Error::Config(format!(
                "Duplicate timezone label: {}",
                entry.label
            )));
        }
        if entry.zone.parse::<chrono_tz::Tz>().is_err() {
            return Err(Error::Config(format!(
                "Unresolvable timezone '{}' for label '{}'",
                entry.zone, entry.label
            )));
        }
    }

    Ok(())
}
