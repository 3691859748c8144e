// Configuration loading and parsing (handlecheck.toml, credentials.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub timing: Timings,
    pub ui: UiConfig,
    pub credentials: CredentialsConfig,
}

impl Config {
    /// The user identifier sent with every request. Empty when no
    /// credentials file is present; the server rejects such requests with a
    /// business-level error.
    pub fn user_id(&self) -> &str {
        self.credentials.user_id.as_deref().unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// handlecheck.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire handlecheck.toml file.
#[derive(Debug, Clone, Deserialize)]
struct SettingsFile {
    server: ServerConfig,
    #[serde(default)]
    timing: Timings,
    #[serde(default)]
    ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Origin of the evaluation service, e.g. `https://checker.example.com`.
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Every fixed delay the controller uses, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Interval between loading-message steps.
    pub loading_step_ms: u64,
    /// Hold time between a successful check response and the result reveal.
    pub reveal_delay_ms: u64,
    /// Length of one count-up animation.
    pub animation_ms: u64,
    /// How long a notification stays before sliding out.
    pub notification_ms: u64,
    /// Slide-out transition length.
    pub slide_out_ms: u64,
    /// Placeholder rotation interval.
    pub placeholder_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            loading_step_ms: 600,
            reveal_delay_ms: 2000,
            animation_ms: 1500,
            notification_ms: 5000,
            slide_out_ms: 300,
            placeholder_ms: 3000,
        }
    }
}

impl Timings {
    pub fn loading_step(&self) -> Duration {
        Duration::from_millis(self.loading_step_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    pub fn notification(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn slide_out(&self) -> Duration {
        Duration::from_millis(self.slide_out_ms)
    }

    pub fn placeholder(&self) -> Duration {
        Duration::from_millis(self.placeholder_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Daily check allowance shown as the denominator of the usage counter.
    pub usage_limit: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig { usage_limit: 3 }
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub user_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/handlecheck.toml` and
/// (optionally) `config/credentials.toml`, relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- handlecheck.toml (required) ---
    let settings_path = config_dir.join(SETTINGS_FILE);
    let settings_text = read_file(&settings_path)?;
    let settings: SettingsFile =
        toml::from_str(&settings_text).map_err(|e| ConfigError::ParseError {
            path: settings_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        server: settings.server,
        timing: settings.timing,
        ui: settings.ui,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

const SETTINGS_FILE: &str = "handlecheck.toml";

/// Seed `config/handlecheck.toml` from `defaults/` when it is missing.
///
/// Returns the written path, or `None` when the settings file was already in
/// place. `credentials.toml` is never seeded: its `.example` stays a template
/// the user copies by hand.
pub fn seed_settings(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(SETTINGS_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(SETTINGS_FILE);
    if !source.exists() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {SETTINGS_FILE} in config/ or defaults/ under {}",
                base_dir.display()
            ),
        });
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", parent.display()),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    })?;
    info!("Seeded {} from defaults", target.display());

    Ok(Some(target))
}

/// Pick the directory that holds `config/` and `defaults/`.
///
/// The working directory wins when it contains either; otherwise the
/// platform config directory (e.g. `~/.config/handlecheck`) is used.
pub fn resolve_base_dir() -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        return Ok(cwd);
    }
    match directories::ProjectDirs::from("", "", "handlecheck") {
        Some(dirs) => Ok(dirs.config_dir().to_path_buf()),
        None => Ok(cwd),
    }
}

/// Convenience wrapper: resolves the base directory, copies defaults, loads.
pub fn load_config() -> Result<Config, ConfigError> {
    let base = resolve_base_dir()?;
    seed_settings(&base)?;
    load_config_from(&base)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.server.base_url.trim();
    match reqwest::Url::parse(base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => {
            return Err(ConfigError::ValidationError {
                field: "server.base_url".into(),
                message: format!("scheme must be http or https, got {:?}", url.scheme()),
            });
        }
        Err(e) => {
            return Err(ConfigError::ValidationError {
                field: "server.base_url".into(),
                message: format!("{base_url:?} is not a valid URL: {e}"),
            });
        }
    }

    if config.server.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "server.request_timeout_secs".into(),
            message: "must be > 0".into(),
        });
    }

    let t = &config.timing;
    let timing_fields: &[(&str, u64)] = &[
        ("timing.loading_step_ms", t.loading_step_ms),
        ("timing.reveal_delay_ms", t.reveal_delay_ms),
        ("timing.animation_ms", t.animation_ms),
        ("timing.notification_ms", t.notification_ms),
        ("timing.slide_out_ms", t.slide_out_ms),
        ("timing.placeholder_ms", t.placeholder_ms),
    ];
    for (name, val) in timing_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.ui.usage_limit == 0 {
        return Err(ConfigError::ValidationError {
            field: "ui.usage_limit".into(),
            message: "must be > 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
