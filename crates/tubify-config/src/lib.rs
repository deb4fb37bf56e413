mod config;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::config::TubifyConfig;
use tracing::debug;
use tubify_core::{SpotifyAuth, TubifyError, TubifyResult};

pub use config::{OutputConfig, SpotifyConfig, TubifyConfig as TubifyConfigData, YouTubeConfig};

pub const YOUTUBE_KEY_ENV: &str = "TUBIFY_YOUTUBE_KEY";
pub const SPOTIFY_CLIENT_ID_ENV: &str = "TUBIFY_SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET_ENV: &str = "TUBIFY_SPOTIFY_CLIENT_SECRET";
pub const SPOTIFY_AUTH_CODE_ENV: &str = "TUBIFY_SPOTIFY_AUTH_CODE";
pub const SPOTIFY_REDIRECT_URI_ENV: &str = "TUBIFY_SPOTIFY_REDIRECT_URI";
pub const OUTPUT_SIMPLE_ENV: &str = "TUBIFY_OUTPUT_SIMPLE";
pub const OUTPUT_JSON_ENV: &str = "TUBIFY_OUTPUT_JSON";

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: [&str; 7] = [
    "youtube.api_key",
    "spotify.client_id",
    "spotify.client_secret",
    "spotify.auth_code",
    "spotify.redirect_uri",
    "output.simple",
    "output.json",
];

pub fn config_path() -> TubifyResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TubifyError::Config("home directory not found".to_string()))?;
    Ok(home.join(".tubify").join("config.toml"))
}

pub fn load_config() -> TubifyResult<TubifyConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(TubifyConfig::default());
    }
    let content = fs::read_to_string(&path)
        .map_err(|err| TubifyError::Config(format!("failed to read config: {err}")))?;
    debug!(path = %path.display(), "loaded config");
    parse_config(&content)
}

pub fn parse_config(content: &str) -> TubifyResult<TubifyConfig> {
    toml::from_str(content)
        .map_err(|err| TubifyError::Config(format!("failed to parse config: {err}")))
}

pub fn save_config(config: &TubifyConfig) -> TubifyResult<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| TubifyError::Config(format!("failed to create config dir: {err}")))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|err| TubifyError::Config(format!("failed to serialize config: {err}")))?;
    fs::write(&path, content)
        .map_err(|err| TubifyError::Config(format!("failed to write config: {err}")))?;
    Ok(())
}

pub fn config_exists() -> TubifyResult<bool> {
    let path = config_path()?;
    Ok(path.exists())
}

pub fn resolve_youtube_key(config: &TubifyConfig) -> Option<String> {
    youtube_key_from(config, env_value)
}

/// Spotify auth mode from env overrides and the config file. Partial
/// credential sets are a configuration error.
pub fn resolve_spotify_auth(config: &TubifyConfig) -> TubifyResult<SpotifyAuth> {
    spotify_auth_from(config, env_value)
}

pub fn resolve_simple_output(config: &TubifyConfig) -> Option<bool> {
    env_flag(OUTPUT_SIMPLE_ENV).or(config.output.simple)
}

pub fn resolve_json_output(config: &TubifyConfig) -> Option<bool> {
    env_flag(OUTPUT_JSON_ENV).or(config.output.json)
}

pub fn get_config_value(config: &TubifyConfig, key_path: &str) -> Option<String> {
    let parts: Vec<&str> = key_path.split('.').collect();

    match parts.as_slice() {
        ["youtube", "api_key"] => config.youtube.api_key.clone(),
        ["spotify", "client_id"] => config.spotify.client_id.clone(),
        ["spotify", "client_secret"] => config.spotify.client_secret.clone(),
        ["spotify", "auth_code"] => config.spotify.auth_code.clone(),
        ["spotify", "redirect_uri"] => config.spotify.redirect_uri.clone(),
        ["output", "simple"] => config.output.simple.map(|b| b.to_string()),
        ["output", "json"] => config.output.json.map(|b| b.to_string()),
        _ => None,
    }
}

pub fn set_config_value(key_path: &str, value: &str) -> TubifyResult<()> {
    let path = config_path()?;
    let content = if path.exists() {
        fs::read_to_string(&path)
            .map_err(|err| TubifyError::Config(format!("failed to read config: {err}")))?
    } else {
        String::new()
    };

    let content = apply_config_value(&content, key_path, value)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| TubifyError::Config(format!("failed to create config dir: {err}")))?;
    }
    fs::write(&path, content)
        .map_err(|err| TubifyError::Config(format!("failed to write config: {err}")))?;

    Ok(())
}

/// Sets `key_path` inside a TOML document, keeping the rest of the file's
/// formatting. Boolean keys are stored as TOML booleans.
pub fn apply_config_value(content: &str, key_path: &str, value: &str) -> TubifyResult<String> {
    if !CONFIG_KEYS.contains(&key_path) {
        return Err(TubifyError::Config(format!(
            "unknown config key '{key_path}' (expected one of: {})",
            CONFIG_KEYS.join(", ")
        )));
    }

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|err| TubifyError::Config(format!("failed to parse config: {err}")))?;

    let Some((section, key)) = key_path.split_once('.') else {
        return Err(TubifyError::Config(format!(
            "key path must be 'section.key', got '{key_path}'"
        )));
    };

    let table = doc
        .as_table_mut()
        .entry(section)
        .or_insert(toml_edit::Item::Table(Default::default()))
        .as_table_mut()
        .ok_or_else(|| TubifyError::Config(format!("cannot set nested value in '{key_path}'")))?;

    table[key] = if section == "output" {
        toml_edit::value(parse_flag(value).ok_or_else(|| {
            TubifyError::Config(format!("'{key_path}' expects true or false, got '{value}'"))
        })?)
    } else {
        toml_edit::value(value)
    };

    Ok(doc.to_string())
}

pub fn open_in_editor() -> TubifyResult<()> {
    let path = config_path()?;
    if !path.exists() {
        save_config(&TubifyConfig::default())?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "vim".to_string()
        } else if cfg!(target_os = "windows") {
            "notepad".to_string()
        } else {
            "nano".to_string()
        }
    });

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .map_err(|err| TubifyError::Config(format!("failed to open editor '{editor}': {err}")))?;

    if !status.success() {
        return Err(TubifyError::Config(format!(
            "editor exited with status: {status}"
        )));
    }

    Ok(())
}

fn youtube_key_from(
    config: &TubifyConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    lookup(YOUTUBE_KEY_ENV).or_else(|| non_blank(config.youtube.api_key.clone()))
}

fn spotify_auth_from(
    config: &TubifyConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> TubifyResult<SpotifyAuth> {
    let spotify = &config.spotify;
    SpotifyAuth::from_parts(
        lookup(SPOTIFY_CLIENT_ID_ENV).or_else(|| spotify.client_id.clone()),
        lookup(SPOTIFY_CLIENT_SECRET_ENV).or_else(|| spotify.client_secret.clone()),
        lookup(SPOTIFY_AUTH_CODE_ENV).or_else(|| spotify.auth_code.clone()),
        lookup(SPOTIFY_REDIRECT_URI_ENV).or_else(|| spotify.redirect_uri.clone()),
    )
}

fn env_value(name: &str) -> Option<String> {
    non_blank(env::var(name).ok())
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().map(|value| parse_flag(&value).unwrap_or(false))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
