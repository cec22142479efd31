use crate::error::AppError;
use crate::urgency::Urgency;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const DATA_DIR_NAME: &str = "data";
const CONFIG_ENV_VAR: &str = "TASKBOARD_CONFIG_PATH";
const BACKEND_URL_ENV_VAR: &str = "TASKBOARD_BACKEND_URL";
const DATA_DIR_ENV_VAR: &str = "TASKBOARD_DATA_DIR";

pub const DEFAULT_CATEGORIES: [&str; 3] = ["Work", "Personal", "Other"];

#[derive(Debug, Clone)]
pub struct Palette {
    pub urgent: &'static str,
    pub soon: &'static str,
    pub later: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn urgency(&self, urgency: Option<Urgency>, text: &str) -> String {
        let color = match urgency {
            Some(Urgency::Urgent) => self.urgent,
            Some(Urgency::Soon) => self.soon,
            Some(Urgency::Later) => self.later,
            None => "",
        };
        paint(color, self.reset, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        paint(self.muted, self.reset, text)
    }
}

fn paint(color: &str, reset: &str, text: &str) -> String {
    if color.is_empty() {
        text.to_string()
    } else {
        format!("{color}{text}{reset}")
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match canonical_theme_name_option(theme) {
        Some(ref name) if name == "noir" => Palette {
            urgent: "\x1b[38;5;203m",
            soon: "\x1b[38;5;221m",
            later: "\x1b[38;5;114m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Some(ref name) if name == "solarized" => Palette {
            urgent: "\x1b[38;5;160m",
            soon: "\x1b[38;5;136m",
            later: "\x1b[38;5;64m",
            muted: "\x1b[38;5;245m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            urgent: "",
            soon: "",
            later: "",
            muted: "",
            reset: "",
        },
    }
}

fn canonical_theme_name_option(theme: Option<&str>) -> Option<String> {
    theme.and_then(canonical_theme_name)
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let cleaned = canonicalize_key(raw);
    if cleaned.is_empty() {
        return Some("default".into());
    }

    match cleaned.as_str() {
        "vanilla" | "light" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" => Some("noir".to_string()),
        other => Some(other.to_string()),
    }
}

/// Lowercases and collapses every run of non-alphanumerics into `_`.
pub fn canonicalize_key(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub backend_url: Option<String>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Categories offered by the add and edit forms, in display order.
    pub fn categories(&self) -> Vec<String> {
        let listed: Vec<String> = self
            .categories
            .iter()
            .map(|category| category.trim())
            .filter(|category| !category.is_empty())
            .map(str::to_string)
            .collect();

        if listed.is_empty() {
            DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
        } else {
            listed
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub categories: Option<Vec<String>>,
    pub backend_url: Option<String>,
    pub data_dir: Option<PathBuf>,
}

fn app_dir() -> Result<PathBuf, AppError> {
    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("taskboard"))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join("taskboard"))
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Some(path) = non_blank_env(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    Ok(app_dir()?.join(CONFIG_FILE_NAME))
}

pub fn default_data_dir() -> Result<PathBuf, AppError> {
    Ok(app_dir()?.join(DATA_DIR_NAME))
}

pub fn load_config_with_fallback() -> ConfigLoad {
    let mut load = match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    };
    load.config = apply_env(load.config);
    load
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    Ok(normalize_config_theme(config))
}

fn apply_env(mut config: Config) -> Config {
    if let Some(url) = non_blank_env(BACKEND_URL_ENV_VAR) {
        config.backend_url = Some(url);
    }
    if let Some(dir) = non_blank_env(DATA_DIR_ENV_VAR) {
        config.data_dir = Some(PathBuf::from(dir));
    }
    config
}

fn normalize_config_theme(mut config: Config) -> Config {
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    config
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_ref()
        && let Some(normalized) = canonical_theme_name(theme)
    {
        merged.theme = Some(normalized);
    }
    if let Some(categories) = overrides.categories.as_ref() {
        merged.categories = categories.clone();
    }
    if let Some(url) = overrides.backend_url.as_ref() {
        merged.backend_url = Some(url.clone());
    }
    if let Some(dir) = overrides.data_dir.as_ref() {
        merged.data_dir = Some(dir.clone());
    }

    merged
}
