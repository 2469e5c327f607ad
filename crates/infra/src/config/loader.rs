//! Configuration loader
//!
//! Builds an [`AppConfig`] from defaults, an optional config file and
//! `INTAKE_*` environment variables.
//!
//! ## Loading Strategy
//! 1. Read a `.env` file into the process environment if one exists
//! 2. Probe the standard locations for a config file, else use defaults
//! 3. Apply environment overrides on top
//! 4. Validate the merged result
//!
//! ## Environment Variables
//! - `INTAKE_TIMEZONE`: IANA timezone for business hours
//! - `INTAKE_WORKING_DAYS`: Comma-separated weekday numbers (0 = Sunday)
//! - `INTAKE_START_TIME` / `INTAKE_END_TIME`: Window bounds as `HH:MM`
//! - `INTAKE_SLOT_MINUTES`: Appointment length in minutes
//! - `INTAKE_MAX_RETRIES`: Retries after the first attempt (both paths)
//! - `INTAKE_BASE_DELAY_MS` / `INTAKE_MAX_DELAY_MS`: Backoff bounds (both
//!   paths)
//! - `INTAKE_ERROR_LOG_CAPACITY`: Diagnostic log size
//! - `INTAKE_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//! - `INTAKE_LOG_JSON`: JSON log output (true/false)
//!
//! ## File Locations
//! The loader probes the following names, in order, in the current working
//! directory, its two parents, and next to the executable:
//! `intake.toml`, `intake.json`, `config.toml`, `config.json`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use intake_domain::utils::parse_hhmm;
use intake_domain::{AppConfig, IntakeError, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["intake.toml", "intake.json", "config.toml", "config.json"];

/// Load configuration using the full strategy described in the module docs.
///
/// # Errors
/// Returns `IntakeError::Config` if a probed file cannot be parsed, an
/// override has an invalid value, or the merged config fails validation.
pub fn load() -> Result<AppConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Could not load .env file"),
    }

    let mut config = match probe_config_paths() {
        Some(path) => read_config_file(&path)?,
        None => {
            tracing::debug!("No config file found, using defaults");
            AppConfig::default()
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    tracing::info!(
        timezone = %config.business_hours.timezone,
        max_retries = config.calendar_retry.max_retries,
        "Configuration loaded"
    );
    Ok(config)
}

/// Defaults plus environment overrides, no file lookup.
///
/// # Errors
/// Returns `IntakeError::Config` on an invalid override or a config that
/// fails validation.
pub fn load_from_env() -> Result<AppConfig> {
    let mut config = AppConfig::default();
    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate configuration from a specific file.
///
/// Format is detected by extension (`.json` or `.toml`). Missing sections
/// and fields take their defaults. Environment overrides are not applied.
///
/// # Errors
/// Returns `IntakeError::Config` if the file is missing, unreadable,
/// malformed or invalid.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IntakeError::Config(format!("Config file not found: {}", path.display())));
    }
    let config = read_config_file(path)?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<AppConfig> {
    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| IntakeError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, path)
}

/// Parse configuration from string content
///
/// # Errors
/// Returns `IntakeError::Config` if format is unsupported or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| IntakeError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| IntakeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(IntakeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

/// Apply every `INTAKE_*` variable that is set on top of `config`.
///
/// Retry overrides apply to both the calendar and the email path.
///
/// # Errors
/// Returns `IntakeError::Config` naming the variable whose value is invalid.
pub fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    let hours = &mut config.business_hours;

    if let Some(raw) = env_var("INTAKE_TIMEZONE") {
        hours.timezone = Tz::from_str(&raw)
            .map_err(|e| invalid("INTAKE_TIMEZONE", &raw, &e.to_string()))?;
    }
    if let Some(raw) = env_var("INTAKE_WORKING_DAYS") {
        hours.working_days = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u8>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| invalid("INTAKE_WORKING_DAYS", &raw, &e.to_string()))?;
    }
    if let Some(raw) = env_var("INTAKE_START_TIME") {
        hours.start_time = parse_hhmm(&raw)
            .ok_or_else(|| invalid("INTAKE_START_TIME", &raw, "expected HH:MM"))?;
    }
    if let Some(raw) = env_var("INTAKE_END_TIME") {
        hours.end_time =
            parse_hhmm(&raw).ok_or_else(|| invalid("INTAKE_END_TIME", &raw, "expected HH:MM"))?;
    }
    if let Some(minutes) = env_parse::<u32>("INTAKE_SLOT_MINUTES")? {
        hours.slot_duration_minutes = minutes;
    }

    if let Some(max_retries) = env_parse::<u32>("INTAKE_MAX_RETRIES")? {
        config.calendar_retry.max_retries = max_retries;
        config.email_retry.max_retries = max_retries;
    }
    if let Some(ms) = env_parse::<u64>("INTAKE_BASE_DELAY_MS")? {
        config.calendar_retry.base_delay = Duration::from_millis(ms);
        config.email_retry.base_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = env_parse::<u64>("INTAKE_MAX_DELAY_MS")? {
        config.calendar_retry.max_delay = Duration::from_millis(ms);
        config.email_retry.max_delay = Duration::from_millis(ms);
    }

    if let Some(capacity) = env_parse::<usize>("INTAKE_ERROR_LOG_CAPACITY")? {
        config.error_log_capacity = capacity;
    }
    if let Some(level) = env_var("INTAKE_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("INTAKE_LOG_JSON", config.logging.json);

    Ok(())
}

/// Non-empty, trimmed value of an environment variable.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|raw| raw.parse::<T>().map_err(|e| invalid(key, &raw, &e.to_string())))
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(key: &str, default: bool) -> bool {
    env_var(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn invalid(key: &str, raw: &str, reason: &str) -> IntakeError {
    IntakeError::Config(format!("Invalid value for {}: {:?} ({})", key, raw, reason))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::io::Write;

    use once_cell::sync::Lazy;
    use parking_lot::Mutex;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const OVERRIDE_KEYS: [&str; 11] = [
        "INTAKE_TIMEZONE",
        "INTAKE_WORKING_DAYS",
        "INTAKE_START_TIME",
        "INTAKE_END_TIME",
        "INTAKE_SLOT_MINUTES",
        "INTAKE_MAX_RETRIES",
        "INTAKE_BASE_DELAY_MS",
        "INTAKE_MAX_DELAY_MS",
        "INTAKE_ERROR_LOG_CAPACITY",
        "INTAKE_LOG_LEVEL",
        "INTAKE_LOG_JSON",
    ];

    fn clear_overrides() {
        for key in OVERRIDE_KEYS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
        path
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock();

        for (i, value) in ["1", "true", "yes", "on", "TRUE"].iter().enumerate() {
            let key = format!("INTAKE_TEST_BOOL_TRUE_{i}");
            std::env::set_var(&key, value);
            assert!(env_bool(&key, false), "{value} should parse as true");
            std::env::remove_var(&key);
        }
        for (i, value) in ["0", "false", "no", "off"].iter().enumerate() {
            let key = format!("INTAKE_TEST_BOOL_FALSE_{i}");
            std::env::set_var(&key, value);
            assert!(!env_bool(&key, true), "{value} should parse as false");
            std::env::remove_var(&key);
        }

        std::env::remove_var("INTAKE_TEST_BOOL_MISSING");
        assert!(env_bool("INTAKE_TEST_BOOL_MISSING", true));
        assert!(!env_bool("INTAKE_TEST_BOOL_MISSING", false));
    }

    #[test]
    fn test_load_from_env_without_overrides_is_default() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        let config = load_from_env().expect("defaults should load");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_env_applies_every_override() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        std::env::set_var("INTAKE_TIMEZONE", "America/New_York");
        std::env::set_var("INTAKE_WORKING_DAYS", "1, 3,5");
        std::env::set_var("INTAKE_START_TIME", "09:00");
        std::env::set_var("INTAKE_END_TIME", "17:00");
        std::env::set_var("INTAKE_SLOT_MINUTES", "45");
        std::env::set_var("INTAKE_MAX_RETRIES", "5");
        std::env::set_var("INTAKE_BASE_DELAY_MS", "250");
        std::env::set_var("INTAKE_MAX_DELAY_MS", "4000");
        std::env::set_var("INTAKE_ERROR_LOG_CAPACITY", "20");
        std::env::set_var("INTAKE_LOG_LEVEL", "debug");
        std::env::set_var("INTAKE_LOG_JSON", "yes");

        let result = load_from_env();
        clear_overrides();
        let config = result.expect("overrides should load");

        let hours = &config.business_hours;
        assert_eq!(hours.timezone, chrono_tz::America::New_York);
        assert_eq!(hours.working_days, BTreeSet::from([1, 3, 5]));
        assert_eq!(intake_domain::utils::format_hhmm(hours.start_time), "09:00");
        assert_eq!(intake_domain::utils::format_hhmm(hours.end_time), "17:00");
        assert_eq!(hours.slot_duration_minutes, 45);
        for retry in [&config.calendar_retry, &config.email_retry] {
            assert_eq!(retry.max_retries, 5);
            assert_eq!(retry.base_delay, Duration::from_millis(250));
            assert_eq!(retry.max_delay, Duration::from_millis(4000));
        }
        assert_eq!(config.error_log_capacity, 20);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        std::env::set_var("INTAKE_MAX_RETRIES", "not-a-number");
        let result = load_from_env();
        clear_overrides();

        let err = result.expect_err("Should fail with invalid retry count");
        assert!(matches!(&err, IntakeError::Config(msg) if msg.contains("INTAKE_MAX_RETRIES")));
    }

    #[test]
    fn test_load_from_env_rejects_unknown_timezone() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        std::env::set_var("INTAKE_TIMEZONE", "Mars/Olympus_Mons");
        let result = load_from_env();
        clear_overrides();

        assert!(matches!(result, Err(IntakeError::Config(msg)) if msg.contains("INTAKE_TIMEZONE")));
    }

    #[test]
    fn test_load_from_env_validates_merged_config() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        // Parses fine but the window is inverted
        std::env::set_var("INTAKE_START_TIME", "18:00");
        let result = load_from_env();
        clear_overrides();

        assert!(matches!(result, Err(IntakeError::Config(_))));
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let _guard = ENV_LOCK.lock();
        clear_overrides();

        std::env::set_var("INTAKE_SLOT_MINUTES", "   ");
        let result = load_from_env();
        clear_overrides();

        assert_eq!(result.expect("blank is unset").business_hours.slot_duration_minutes, 30);
    }

    #[test]
    fn test_load_from_file_json() {
        let path = temp_config(
            r#"{
                "business_hours": { "timezone": "Europe/London", "start_time": "10:00" },
                "calendar_retry": { "max_retries": 1 }
            }"#,
            "json",
        );

        let config = load_from_file(&path).expect("Should parse JSON config");
        assert_eq!(config.business_hours.timezone, chrono_tz::Europe::London);
        assert_eq!(config.business_hours.end_time, AppConfig::default().business_hours.end_time);
        assert_eq!(config.calendar_retry.max_retries, 1);
        assert_eq!(config.email_retry.max_retries, 3);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = temp_config(
            r#"
error_log_capacity = 10

[business_hours]
working_days = [2, 4]
slot_duration_minutes = 15

[email_retry]
retryable_kinds = ["network"]
"#,
            "toml",
        );

        let config = load_from_file(&path).expect("Should parse TOML config");
        assert_eq!(config.error_log_capacity, 10);
        assert_eq!(config.business_hours.working_days, BTreeSet::from([2, 4]));
        assert_eq!(config.business_hours.slot_duration_minutes, 15);
        assert!(config.email_retry.allows(intake_domain::ErrorKind::Network));
        assert!(!config.email_retry.allows(intake_domain::ErrorKind::Api));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file("/nonexistent/path/intake.toml");
        assert!(matches!(result, Err(IntakeError::Config(msg)) if msg.contains("not found")));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("{}", Path::new("intake.yaml"));
        assert!(matches!(result, Err(IntakeError::Config(msg)) if msg.contains("Unsupported")));
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config("{ not json", Path::new("intake.json"));
        assert!(matches!(result, Err(IntakeError::Config(msg)) if msg.contains("Invalid JSON")));
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let path = temp_config(r#"{ "business_hours": { "working_days": [] } }"#, "json");

        assert!(matches!(load_from_file(&path), Err(IntakeError::Config(_))));

        std::fs::remove_file(path).ok();
    }
}
