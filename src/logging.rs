//! Logging
//!
//! Structured logging through `tracing`. Level, format and destination come from
//! [`LoggingConfig`], and each can be overridden by an environment variable:
//!
//! - `SIMVFS_LOG`: filter directives, e.g. `debug` or `simvfs::service=trace`
//! - `SIMVFS_LOG_FORMAT`: `text` or `json`
//! - `SIMVFS_LOG_OUTPUT`: `stdout`, `stderr`, `file` or `file+stderr`
//! - `SIMVFS_LOG_FILE`: log file path when output includes a file
//! - `SIMVFS_LOG_MODULES`: extra `module=level` pairs, comma separated

use crate::config::paths::default_log_file;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const ENV_LOG: &str = "SIMVFS_LOG";
pub const ENV_LOG_FORMAT: &str = "SIMVFS_LOG_FORMAT";
pub const ENV_LOG_OUTPUT: &str = "SIMVFS_LOG_OUTPUT";
pub const ENV_LOG_FILE: &str = "SIMVFS_LOG_FILE";
pub const ENV_LOG_MODULES: &str = "SIMVFS_LOG_MODULES";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr (default: stderr)
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means the platform state directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored text output on terminals
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogOutput {
    Stdout,
    Stderr,
    File,
    FileAndStderr,
}

impl LogOutput {
    fn parse(output: &str) -> Result<Self, ApiError> {
        match output {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            _ => Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file' or 'file+stderr')",
                output
            ))),
        }
    }

    fn uses_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

/// Resolve the log file path: `SIMVFS_LOG_FILE`, then config, then the platform default.
pub fn resolve_log_file_path(config_file: Option<PathBuf>) -> Result<PathBuf, ApiError> {
    if let Ok(env_path) = std::env::var(ENV_LOG_FILE) {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    match config_file {
        Some(p) if !p.as_os_str().is_empty() => Ok(p),
        _ => default_log_file(),
    }
}

/// Install the global subscriber.
///
/// Priority (highest first): environment variables, `config`, defaults.
/// Fails if a subscriber is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    if config.map(|c| !c.enabled).unwrap_or(false) {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)));
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let ansi = format == LogFormat::Text
        && !output.uses_file()
        && config.map(|c| c.color).unwrap_or(true);
    let writer = make_writer(output, config)?;

    let subscriber = Registry::default().with(filter);
    let installed = match format {
        LogFormat::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Text => subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };
    installed.map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)))
}

fn make_writer(
    output: LogOutput,
    config: Option<&LoggingConfig>,
) -> Result<BoxMakeWriter, ApiError> {
    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File => BoxMakeWriter::new(Arc::new(open_log_file(config)?)),
        LogOutput::FileAndStderr => {
            BoxMakeWriter::new(Arc::new(open_log_file(config)?).and(std::io::stderr))
        }
    };
    Ok(writer)
}

fn open_log_file(config: Option<&LoggingConfig>) -> Result<std::fs::File, ApiError> {
    let log_file = resolve_log_file_path(config.and_then(|c| c.file.clone()))?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
        })
}

fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_LOG) {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut directives: Vec<String> = Vec::new();
    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            directives.push(format!("{}={}", module, module_level));
        }
    }
    if let Ok(modules) = std::env::var(ENV_LOG_MODULES) {
        directives.extend(parse_module_levels(&modules));
    }

    let mut filter = EnvFilter::new(level);
    for directive in directives {
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}

/// `a=debug, b = trace` -> `["a=debug", "b=trace"]`; malformed pairs are skipped
fn parse_module_levels(pairs: &str) -> Vec<String> {
    pairs.split(',')
        .filter_map(|pair| {
            let (module, level) = pair.split_once('=')?;
            let (module, level) = (module.trim(), level.trim());
            if module.is_empty() || level.is_empty() {
                None
            } else {
                Some(format!("{}={}", module, level))
            }
        })
        .collect()
}

fn determine_format(config: Option<&LoggingConfig>) -> Result<LogFormat, ApiError> {
    let from_env = std::env::var(ENV_LOG_FORMAT).ok();
    let format = from_env
        .as_deref()
        .or_else(|| config.map(|c| c.format.as_str()))
        .unwrap_or("text");
    parse_format(format)
}

fn parse_format(format: &str) -> Result<LogFormat, ApiError> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        _ => Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        ))),
    }
}

fn determine_output(config: Option<&LoggingConfig>) -> Result<LogOutput, ApiError> {
    if let Ok(output) = std::env::var(ENV_LOG_OUTPUT) {
        return LogOutput::parse(&output);
    }
    LogOutput::parse(config.map(|c| c.output.as_str()).unwrap_or("stderr"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "text");
        assert_eq!(config.output, "stderr");
        assert_eq!(config.file, None);
    }

    #[test]
    fn test_parse_output() {
        assert_eq!(LogOutput::parse("stdout").unwrap(), LogOutput::Stdout);
        assert_eq!(
            LogOutput::parse("file+stderr").unwrap(),
            LogOutput::FileAndStderr
        );
        assert!(LogOutput::File.uses_file());
        assert!(!LogOutput::Stderr.uses_file());
        assert!(LogOutput::parse("both").is_err());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("json").unwrap(), LogFormat::Json);
        assert!(parse_format("yaml").is_err());
    }

    #[test]
    fn test_parse_module_levels_skips_malformed() {
        let parsed = parse_module_levels("simvfs::service=debug, sled = warn,broken,=info");
        assert_eq!(parsed, vec!["simvfs::service=debug", "sled=warn"]);
    }

    #[test]
    fn test_resolve_log_file_path() {
        let config = Some(PathBuf::from("/tmp/config.log"));
        std::env::remove_var(ENV_LOG_FILE);
        assert_eq!(
            resolve_log_file_path(config).unwrap(),
            PathBuf::from("/tmp/config.log")
        );
        assert!(resolve_log_file_path(None)
            .unwrap()
            .ends_with("simvfs.log"));
    }
}
