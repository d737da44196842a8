//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CONCIERGE_BACKEND_API`: Backend base URL (required)
//! - `CONCIERGE_DOMAIN`: Domain of the concierge address (required)
//! - `CONCIERGE_STAGE`: Deployment stage, `dev` enables the `.dev` rule
//! - `CONCIERGE_REQUEST_TIMEOUT`: Per-call timeout in seconds
//! - `CONCIERGE_MAX_ATTEMPTS`: Attempts for idempotent requests
//! - `CONCIERGE_POLL_INTERVAL_MS`: Re-poll interval while no claim exists
//!
//! ## File Locations
//! The loader probes `concierge.{toml,json}` then `config.{toml,json}` in:
//! 1. The current working directory
//! 2. Its parent and grandparent
//! 3. The executable's directory

use std::path::{Path, PathBuf};

use concierge_domain::constants::MIN_POLL_INTERVAL_MS;
use concierge_domain::{
    BackendConfig, ClaimTimingConfig, ConciergeConfig, ConciergeError, Result, Stage,
};
use url::Url;

const FILE_NAMES: [&str; 4] = ["concierge.toml", "concierge.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ConciergeError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The backend URL or domain is invalid
pub fn load() -> Result<ConciergeConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `ConciergeError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<ConciergeConfig> {
    let base_url = env_var("CONCIERGE_BACKEND_API")?;
    let domain = env_var("CONCIERGE_DOMAIN")?;
    let stage = std::env::var("CONCIERGE_STAGE").map(Stage::from).unwrap_or_default();

    let mut backend = BackendConfig::new(base_url);
    if let Some(secs) = env_parse::<u64>("CONCIERGE_REQUEST_TIMEOUT")? {
        backend.request_timeout_secs = secs;
    }
    if let Some(attempts) = env_parse::<usize>("CONCIERGE_MAX_ATTEMPTS")? {
        backend.max_attempts = attempts;
    }

    let mut claim = ClaimTimingConfig::default();
    if let Some(ms) = env_parse::<u64>("CONCIERGE_POLL_INTERVAL_MS")? {
        claim.poll_interval_ms = ms;
    }

    validate(ConciergeConfig { backend, domain, stage, claim })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ConciergeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ConciergeConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConciergeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ConciergeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ConciergeError::Config(format!("Failed to read config file: {e}")))?;

    validate(parse_config(&contents, &config_path)?)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ConciergeConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConciergeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConciergeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ConciergeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Normalize and check a loaded configuration.
///
/// The base URL must be an absolute http(s) URL and is stored without a
/// trailing slash so paths can be appended directly.
fn validate(mut config: ConciergeConfig) -> Result<ConciergeConfig> {
    let trimmed = config.backend.base_url.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| ConciergeError::Config(format!("Invalid backend URL '{trimmed}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConciergeError::Config(format!(
            "Backend URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    config.backend.base_url = trimmed.to_string();

    config.domain = config.domain.trim().to_string();
    if config.domain.is_empty() {
        return Err(ConciergeError::Config("Concierge domain must not be empty".into()));
    }
    if config.backend.request_timeout_secs == 0 {
        return Err(ConciergeError::Config("Request timeout must be at least 1 second".into()));
    }
    if config.claim.poll_interval_ms < MIN_POLL_INTERVAL_MS {
        return Err(ConciergeError::Config(format!(
            "Poll interval must be at least {MIN_POLL_INTERVAL_MS} ms, got {}",
            config.claim.poll_interval_ms
        )));
    }

    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    probe_in(&dirs)
}

fn probe_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        ConciergeError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConciergeError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::TempDir;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: [&str; 6] = [
        "CONCIERGE_BACKEND_API",
        "CONCIERGE_DOMAIN",
        "CONCIERGE_STAGE",
        "CONCIERGE_REQUEST_TIMEOUT",
        "CONCIERGE_MAX_ATTEMPTS",
        "CONCIERGE_POLL_INTERVAL_MS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("CONCIERGE_BACKEND_API", "https://api.example.com/");
        std::env::set_var("CONCIERGE_DOMAIN", "mail.example.com");
        std::env::set_var("CONCIERGE_STAGE", "dev");
        std::env::set_var("CONCIERGE_REQUEST_TIMEOUT", "5");
        std::env::set_var("CONCIERGE_POLL_INTERVAL_MS", "750");

        let config = load_from_env();
        clear_env();

        let config = config.expect("config from env");
        assert_eq!(config.backend.base_url, "https://api.example.com");
        assert_eq!(config.backend.request_timeout_secs, 5);
        assert_eq!(config.backend.max_attempts, 3);
        assert_eq!(config.domain, "mail.example.com");
        assert!(config.stage.is_dev());
        assert_eq!(config.claim.poll_interval_ms, 750);
        assert_eq!(config.claim.confirmation_window_ms, 3000);
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("CONCIERGE_BACKEND_API", "https://api.example.com");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(ConciergeError::Config(msg)) if msg.contains("CONCIERGE_DOMAIN")));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("CONCIERGE_BACKEND_API", "https://api.example.com");
        std::env::set_var("CONCIERGE_DOMAIN", "mail.example.com");
        std::env::set_var("CONCIERGE_REQUEST_TIMEOUT", "soon");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(ConciergeError::Config(_))));
    }

    #[test]
    fn test_stage_defaults_to_prod() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("CONCIERGE_BACKEND_API", "http://localhost:8080");
        std::env::set_var("CONCIERGE_DOMAIN", "mail.example.com");

        let config = load_from_env();
        clear_env();

        assert!(!config.unwrap().stage.is_dev());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = ConciergeConfig {
            backend: BackendConfig::new("not a url"),
            domain: "mail.example.com".into(),
            stage: Stage::default(),
            claim: ClaimTimingConfig::default(),
        };
        assert!(validate(config.clone()).is_err());

        config.backend.base_url = "ftp://files.example.com".into();
        assert!(validate(config.clone()).is_err());

        config.backend.base_url = "https://api.example.com//".into();
        assert_eq!(validate(config).unwrap().backend.base_url, "https://api.example.com");
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let mut config = ConciergeConfig {
            backend: BackendConfig::new("https://api.example.com"),
            domain: "mail.example.com".into(),
            stage: Stage::default(),
            claim: ClaimTimingConfig { poll_interval_ms: 0, ..ClaimTimingConfig::default() },
        };
        assert!(matches!(validate(config.clone()), Err(ConciergeError::Config(msg)) if msg.contains("Poll interval")));

        config.claim.poll_interval_ms = MIN_POLL_INTERVAL_MS;
        assert!(validate(config).is_ok());
    }

    #[test]
    fn test_load_from_env_rejects_zero_poll_interval() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("CONCIERGE_BACKEND_API", "https://api.example.com");
        std::env::set_var("CONCIERGE_DOMAIN", "mail.example.com");
        std::env::set_var("CONCIERGE_POLL_INTERVAL_MS", "0");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(ConciergeError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_blank_domain() {
        let config = ConciergeConfig {
            backend: BackendConfig::new("https://api.example.com"),
            domain: "  ".into(),
            stage: Stage::default(),
            claim: ClaimTimingConfig::default(),
        };
        assert!(validate(config).is_err());
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
domain = "mail.example.com"
stage = "dev"

[backend]
base_url = "https://api.example.com"
request_timeout_secs = 4

[claim]
poll_interval_ms = 1000
"#;

        let config = parse_config(toml_content, Path::new("concierge.toml")).unwrap();
        assert!(config.stage.is_dev());
        assert_eq!(config.backend.request_timeout_secs, 4);
        assert_eq!(config.claim.poll_interval_ms, 1000);
        assert_eq!(config.claim.refresh_debounce_ms, 500);
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("concierge.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/concierge.toml")));
        assert!(matches!(result, Err(ConciergeError::Config(_))));
    }

    #[test]
    fn test_probe_prefers_concierge_file_over_generic_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        std::fs::write(dir.path().join("concierge.json"), "{}").unwrap();

        let found = probe_in(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found.file_name().unwrap(), "concierge.json");
    }

    #[test]
    fn test_probe_searches_directories_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(second.path().join("config.toml"), "").unwrap();

        let found = probe_in(&[first.path().to_path_buf(), second.path().to_path_buf()]).unwrap();
        assert!(found.starts_with(second.path()));
        assert!(probe_in(&[first.path().to_path_buf()]).is_none());
    }
}
