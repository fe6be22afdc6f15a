use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::school_year::DEFAULT_WINDOW_SIZE;

const MAX_WINDOW_SIZE: u8 = 20;
const MAX_SIMULATED_LATENCY_MS: u64 = 10_000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub portal: PortalConfig,
    pub submission: SubmissionConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct PortalConfig {
    /// How many school years, counting back from the current one, a request may target.
    pub school_year_window: u8,
    /// Actor name recorded on decisions when the reviewer gives none.
    pub reviewer_name: String,
}

#[derive(Clone, Debug)]
pub struct SubmissionConfig {
    pub simulated_latency_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub school_year_window: Option<u8>,
    pub reviewer_name: Option<String>,
    pub simulated_latency_ms: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            portal: PortalConfig {
                school_year_window: DEFAULT_WINDOW_SIZE,
                reviewer_name: "Vous".to_string(),
            },
            submission: SubmissionConfig { simulated_latency_ms: 1500 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("docdesk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(portal) = patch.portal {
            if let Some(school_year_window) = portal.school_year_window {
                self.portal.school_year_window = school_year_window;
            }
            if let Some(reviewer_name) = portal.reviewer_name {
                self.portal.reviewer_name = reviewer_name;
            }
        }

        if let Some(submission) = patch.submission {
            if let Some(simulated_latency_ms) = submission.simulated_latency_ms {
                self.submission.simulated_latency_ms = simulated_latency_ms;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DOCDESK_PORTAL_SCHOOL_YEAR_WINDOW") {
            self.portal.school_year_window =
                parse_u8("DOCDESK_PORTAL_SCHOOL_YEAR_WINDOW", &value)?;
        }
        if let Some(value) = read_env("DOCDESK_PORTAL_REVIEWER_NAME") {
            self.portal.reviewer_name = value;
        }

        if let Some(value) = read_env("DOCDESK_SUBMISSION_SIMULATED_LATENCY_MS") {
            self.submission.simulated_latency_ms =
                parse_u64("DOCDESK_SUBMISSION_SIMULATED_LATENCY_MS", &value)?;
        }

        let log_level =
            read_env("DOCDESK_LOGGING_LEVEL").or_else(|| read_env("DOCDESK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("DOCDESK_LOGGING_FORMAT").or_else(|| read_env("DOCDESK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(school_year_window) = overrides.school_year_window {
            self.portal.school_year_window = school_year_window;
        }
        if let Some(reviewer_name) = overrides.reviewer_name {
            self.portal.reviewer_name = reviewer_name;
        }
        if let Some(simulated_latency_ms) = overrides.simulated_latency_ms {
            self.submission.simulated_latency_ms = simulated_latency_ms;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_portal(&self.portal)?;
        validate_submission(&self.submission)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("docdesk.toml"), PathBuf::from("config/docdesk.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_portal(portal: &PortalConfig) -> Result<(), ConfigError> {
    if portal.school_year_window == 0 || portal.school_year_window > MAX_WINDOW_SIZE {
        return Err(ConfigError::Validation(format!(
            "portal.school_year_window must be in range 1..={MAX_WINDOW_SIZE}"
        )));
    }

    if portal.reviewer_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "portal.reviewer_name must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_submission(submission: &SubmissionConfig) -> Result<(), ConfigError> {
    if submission.simulated_latency_ms > MAX_SIMULATED_LATENCY_MS {
        return Err(ConfigError::Validation(format!(
            "submission.simulated_latency_ms must be at most {MAX_SIMULATED_LATENCY_MS}"
        )));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u8(key: &str, value: &str) -> Result<u8, ConfigError> {
    value.trim().parse::<u8>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    portal: Option<PortalPatch>,
    submission: Option<SubmissionPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PortalPatch {
    school_year_window: Option<u8>,
    reviewer_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SubmissionPatch {
    simulated_latency_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
