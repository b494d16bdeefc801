//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `RALLYPOINT_DB_PATH` is set, configuration comes from the
//!    environment (unset variables keep their defaults)
//! 2. Otherwise the first config file found by [`find_config_path`] is used
//! 3. With neither, built-in defaults apply
//!
//! The result is always validated before it is returned.
//!
//! ## Environment Variables
//! - `RALLYPOINT_DB_PATH`: Database file path
//! - `RALLYPOINT_DB_POOL_SIZE`: Connection pool size
//! - `RALLYPOINT_PROVIDER_API_BASE`: Calendar API base URL
//! - `RALLYPOINT_PROVIDER_TOKEN_ENDPOINT`: OAuth token endpoint
//! - `RALLYPOINT_PROVIDER_CLIENT_ID` / `RALLYPOINT_PROVIDER_CLIENT_SECRET`
//! - `RALLYPOINT_PROVIDER_CALENDAR_ID`: Calendar to read (default `primary`)
//! - `RALLYPOINT_PROVIDER_FETCH_TIMEOUT`: Fetch timeout in seconds
//! - `RALLYPOINT_PROVIDER_MAX_RESULTS`: Event cap per fetch
//! - `RALLYPOINT_TIMEZONE`: IANA timezone for day boundaries
//! - `RALLYPOINT_DAY_START` / `RALLYPOINT_DAY_END`: `HH:MM` working window
//! - `RALLYPOINT_MIN_FREE_MINUTES`: Minimum free slot length
//! - `RALLYPOINT_REFRESH_BUFFER_SECS`: Token refresh lead time
//! - `RALLYPOINT_REFRESH_LOCK_IDLE_SECS`: Idle expiry of per-user refresh locks
//! - `RALLYPOINT_BIND_ADDR`: HTTP listen address
//! - `RALLYPOINT_LOG_LEVEL` / `RALLYPOINT_LOG_JSON`: Logging
//!
//! ## File Locations
//! The loader searches for `rallypoint.toml`, `rallypoint.json`, `config.toml` and
//! `config.json` in the working directory, its parent and grandparent, then
//! next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rallypoint_domain::{Config, RallypointError, Result};

const ENV_MARKER: &str = "RALLYPOINT_DB_PATH";
const CONFIG_FILE_NAMES: [&str; 4] =
    ["rallypoint.toml", "rallypoint.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `RallypointError::Config` if a source exists but cannot be parsed,
/// or if the resulting configuration is invalid.
pub fn load() -> Result<Config> {
    if std::env::var_os(ENV_MARKER).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match find_config_path() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration file found, using defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Load configuration from process environment variables
///
/// # Errors
/// Returns `RallypointError::Config` if `RALLYPOINT_DB_PATH` is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    load_from_vars(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary variable lookup
///
/// Variables that are not present keep their default value.
///
/// # Errors
/// Returns `RallypointError::Config` if `RALLYPOINT_DB_PATH` is missing or a
/// variable has an invalid value.
pub fn load_from_vars<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    config.database.path = lookup(ENV_MARKER).ok_or_else(|| {
        RallypointError::Config(format!("Missing required environment variable: {ENV_MARKER}"))
    })?;
    set_parsed(&lookup, "RALLYPOINT_DB_POOL_SIZE", &mut config.database.pool_size)?;

    let provider = &mut config.provider;
    set_string(&lookup, "RALLYPOINT_PROVIDER_API_BASE", &mut provider.api_base_url);
    set_string(&lookup, "RALLYPOINT_PROVIDER_TOKEN_ENDPOINT", &mut provider.token_endpoint);
    set_string(&lookup, "RALLYPOINT_PROVIDER_CLIENT_ID", &mut provider.client_id);
    if let Some(secret) = lookup("RALLYPOINT_PROVIDER_CLIENT_SECRET") {
        provider.client_secret = Some(secret);
    }
    set_string(&lookup, "RALLYPOINT_PROVIDER_CALENDAR_ID", &mut provider.calendar_id);
    set_parsed(&lookup, "RALLYPOINT_PROVIDER_FETCH_TIMEOUT", &mut provider.fetch_timeout_secs)?;
    set_parsed(&lookup, "RALLYPOINT_PROVIDER_MAX_RESULTS", &mut provider.max_results)?;

    let availability = &mut config.availability;
    set_string(&lookup, "RALLYPOINT_TIMEZONE", &mut availability.timezone);
    set_string(&lookup, "RALLYPOINT_DAY_START", &mut availability.day_start);
    set_string(&lookup, "RALLYPOINT_DAY_END", &mut availability.day_end);
    set_parsed(&lookup, "RALLYPOINT_MIN_FREE_MINUTES", &mut availability.min_free_minutes)?;
    set_parsed(&lookup, "RALLYPOINT_REFRESH_BUFFER_SECS", &mut availability.refresh_buffer_secs)?;
    set_parsed(
        &lookup,
        "RALLYPOINT_REFRESH_LOCK_IDLE_SECS",
        &mut availability.refresh_lock_idle_secs,
    )?;

    set_string(&lookup, "RALLYPOINT_BIND_ADDR", &mut config.server.bind_addr);
    set_string(&lookup, "RALLYPOINT_LOG_LEVEL", &mut config.logging.level);
    if let Some(value) = lookup("RALLYPOINT_LOG_JSON") {
        config.logging.json = parse_bool(&value);
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `RallypointError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or the configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RallypointError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_path().ok_or_else(|| {
            RallypointError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RallypointError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content, by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RallypointError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RallypointError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(RallypointError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Search the standard locations for a configuration file
///
/// Returns the first file found, or `None`.
pub fn find_config_path() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn set_string<F>(lookup: &F, key: &str, target: &mut String)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(key) {
        *target = value;
    }
}

fn set_parsed<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = lookup(key) {
        *target = value
            .trim()
            .parse()
            .map_err(|e| RallypointError::Config(format!("Invalid value for {key}: {e}")))?;
    }
    Ok(())
}

/// Accepts `1`/`true`/`yes`/`on` (case-insensitive) as true.
fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
