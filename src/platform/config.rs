// LogLens - platform/config.rs
//
// Platform-specific data directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::upload::UploadPolicy;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogLens data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/loglens/).
    pub config_dir: PathBuf,

    /// Data directory holding the history ledger.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default ledger slot location.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(constants::LEDGER_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[upload]` section.
    pub upload: UploadSection,
    /// `[analysis]` section.
    pub analysis: AnalysisSection,
    /// `[history]` section.
    pub history: HistorySection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// `[upload]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UploadSection {
    /// Maximum accepted file size in bytes.
    pub max_file_size_bytes: Option<u64>,
    /// Accepted extensions, with or without a leading dot.
    pub accepted_extensions: Option<Vec<String>>,
}

/// `[analysis]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Rows in the recent-records preview.
    pub preview_rows: Option<usize>,
}

/// `[history]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct HistorySection {
    /// Ledger file path; relative paths resolve against the data directory.
    pub ledger_file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,

    /// Upload gate limits.
    pub upload: UploadPolicy,

    /// Rows in the recent-records preview.
    pub preview_rows: usize,

    /// Explicit ledger location, if configured.
    pub ledger_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            upload: UploadPolicy::default(),
            preview_rows: constants::DEFAULT_PREVIEW_ROWS,
            ledger_file: None,
        }
    }
}

impl AppConfig {
    /// Ledger location: the configured file (relative to `data_dir` when
    /// not absolute) or the default in `data_dir`.
    pub fn ledger_path(&self, paths: &PlatformPaths) -> PathBuf {
        match &self.ledger_file {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => paths.data_dir.join(file),
            None => paths.ledger_path(),
        }
    }
}

/// Load and validate `config.toml` from `config_dir`.
///
/// Returns the validated config and a list of non-fatal problems. A missing
/// file yields defaults with no warnings; an unreadable or unparseable file
/// yields defaults with one warning. The application always starts.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(source) => {
            warnings.push(ConfigError::Io {
                path: config_path,
                source,
            });
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(source) => {
            warnings.push(ConfigError::TomlParse {
                path: config_path,
                source,
            });
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<ConfigError>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "logging.level".to_string(),
                value: level,
                expected: valid.join(", "),
            });
        }
    }

    // -- Upload: max_file_size_bytes --
    if let Some(size) = raw.upload.max_file_size_bytes {
        if (1..=constants::ABSOLUTE_MAX_UPLOAD_SIZE).contains(&size) {
            config.upload.max_size_bytes = size;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "upload.max_file_size_bytes".to_string(),
                value: size.to_string(),
                expected: format!("1-{}", constants::ABSOLUTE_MAX_UPLOAD_SIZE),
            });
        }
    }

    // -- Upload: accepted_extensions --
    if let Some(exts) = raw.upload.accepted_extensions {
        let normalised: Vec<String> = exts
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if normalised.is_empty() {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "upload.accepted_extensions".to_string(),
                value: format!("{exts:?}"),
                expected: "at least one non-empty extension".to_string(),
            });
        } else {
            config.upload.accepted_extensions = normalised;
        }
    }

    // -- Analysis: preview_rows --
    if let Some(rows) = raw.analysis.preview_rows {
        if (1..=constants::ABSOLUTE_MAX_PREVIEW_ROWS).contains(&rows) {
            config.preview_rows = rows;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "analysis.preview_rows".to_string(),
                value: rows.to_string(),
                expected: format!("1-{}", constants::ABSOLUTE_MAX_PREVIEW_ROWS),
            });
        }
    }

    // -- History: ledger_file --
    if let Some(file) = raw.history.ledger_file {
        if !file.trim().is_empty() {
            config.ledger_file = Some(PathBuf::from(file));
        }
    }

    config
}
