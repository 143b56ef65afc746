//! Structured error handling with codes, context and recovery suggestions
//!
//! Every failure in the build configuration pass is fatal to the invocation,
//! so errors carry enough information to be reported once and then exit:
//! - An error code for programmatic handling and exit-code mapping
//! - Optional context describing where the failure happened
//! - An optional recovery suggestion
//! - A serializable report for `--json` output

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,
    PathResolutionError = 2003,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,
    MissingField = 3004,

    // Process errors (5xxx)
    ProcessError = 5000,
    CommandNotFound = 5001,
    CommandFailed = 5002,

    // Validation errors (6xxx)
    ValidationError = 6000,
    InvalidFormat = 6002,

    // Platform-specific errors (8xxx)
    PlatformError = 8000,
    GradleError = 8002,
    SigningConfigNotFound = 8010,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            5 => "Process",
            6 => "Validation",
            8 => "Platform",
            _ => "Unknown",
        }
    }

    /// Exit code used by the CLI when an error with this code ends the run
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::PathResolutionError => exit_codes::PATH_ERROR,
            ErrorCode::SigningConfigNotFound => exit_codes::SIGNING_ERROR,
            ErrorCode::CommandNotFound => exit_codes::COMMAND_NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::InvalidFormat => {
                exit_codes::VALIDATION_ERROR
            }
            code if code.code() / 1000 == 3 => exit_codes::CONFIG_ERROR,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether this error belongs to the configuration family
    /// (missing field, invariant violation, unparsable file).
    pub fn is_configuration_error(&self) -> bool {
        self.code.code() / 1000 == 3
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
    }

    pub fn config_not_found(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a fineer-build.toml file or use --config to specify a path")
    }

    pub fn missing_field(key: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Missing required field: {}", key),
        )
        .with_suggestion(format!("Set `{}` in the build configuration", key))
    }

    pub fn signing_config_not_found(name: &str, known: &[String]) -> Self {
        let known = if known.is_empty() {
            "none".to_string()
        } else {
            known.join(", ")
        };
        Self::new(
            ErrorCode::SigningConfigNotFound,
            format!("Signing config not found: {}", name),
        )
        .with_context(format!("Known signing configs: {}", known))
        .with_suggestion(format!("Declare [signing_configs.{}] or reference an existing one", name))
    }

    pub fn path_resolution(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PathResolutionError, message.into())
            .with_context(format!("Path: {}", path.as_ref().display()))
    }

    pub fn process(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProcessError, message)
    }

    pub fn command_not_found(cmd: &str) -> Self {
        Self::new(
            ErrorCode::CommandNotFound,
            format!("Command not found: {}", cmd),
        )
        .with_suggestion(format!("Install {} and ensure it's in your PATH", cmd))
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const SIGNING_ERROR: i32 = 6;
    pub const PATH_ERROR: i32 = 7;
    pub const COMMAND_NOT_FOUND: i32 = 127;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::Internal, format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::new(ErrorCode::InvalidFormat, format!("Regex error: {}", err))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::SigningConfigNotFound.to_string(), "E8010");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::PathResolutionError.category(), "IO");
        assert_eq!(ErrorCode::MissingField.category(), "Configuration");
        assert_eq!(ErrorCode::SigningConfigNotFound.category(), "Platform");
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(ErrorCode::MissingField.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::ConfigValidationError.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::SigningConfigNotFound.exit_code(), exit_codes::SIGNING_ERROR);
        assert_eq!(ErrorCode::PathResolutionError.exit_code(), exit_codes::PATH_ERROR);
        assert_eq!(ErrorCode::GradleError.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_configuration_family() {
        assert!(Error::missing_field("android.namespace").is_configuration_error());
        assert!(Error::config("minSdk > targetSdk").is_configuration_error());
        assert!(!Error::signing_config_not_found("debug", &[]).is_configuration_error());
    }

    #[test]
    fn test_signing_error_lists_known_configs() {
        let err = Error::signing_config_not_found("upload", &["debug".to_string()]);
        assert_eq!(err.code, ErrorCode::SigningConfigNotFound);
        assert_eq!(err.context.as_deref(), Some("Known signing configs: debug"));
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::path_resolution("build/app", "Failed to create directory")
            .with_context("During build preparation");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E2003"));
        assert!(json.contains("PATH_RESOLUTION_ERROR"));
    }
}
