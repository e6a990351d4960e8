//! Unified error handling for the desk simulator
//!
//! Every fallible operation in the crate returns `DeskResult<T>`. Calculation
//! functions report precondition violations as typed errors instead of
//! letting NaN leak into charts and metrics.

use std::fmt;
use std::io;

/// Main error type for the desk simulator
#[derive(Debug, Clone, PartialEq)]
pub enum DeskError {
    // Configuration errors
    ConfigNotFound(String),
    ConfigParse(String),
    ConfigValidation(String),

    // Exchange API errors
    ApiTimeout(String),
    ApiConnection(String),
    ApiResponse(String),
    ApiParse(String),
    RetriesExhausted { operation: String, attempts: u32 },

    // Calculation preconditions
    InsufficientData(String),
    InvalidParameter(String, String), // (parameter_name, reason)

    // IO errors
    FileNotFound(String),
    FileRead(String),
    FileWrite(String),

    // Network errors
    ConnectionTimeout(String),

    Internal(String),
}

impl DeskError {
    /// Shorthand for `InvalidParameter`
    pub fn invalid(param: &str, reason: impl Into<String>) -> Self {
        DeskError::InvalidParameter(param.to_string(), reason.into())
    }

    /// Shorthand for `InsufficientData`
    pub fn insufficient(msg: impl Into<String>) -> Self {
        DeskError::InsufficientData(msg.into())
    }

    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            DeskError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: desk init\n\
                    2. Edit config.toml (pairs, seed, defaults)\n\
                    3. Try again",
                    path
                )
            }
            DeskError::ConfigValidation(msg) => {
                format!(
                    "Configuration validation error: {}\n\n\
                    💡 Check config.toml for:\n\
                    - Positive notional and path length\n\
                    - var_alpha strictly between 0 and 1\n\
                    - Non-empty stress grids",
                    msg
                )
            }
            DeskError::RetriesExhausted { operation, attempts } => {
                format!(
                    "Exchange request '{}' timed out {} times\n\n\
                    💡 Try:\n\
                    1. Check network connectivity\n\
                    2. Raise exchange.timeout_ms in config.toml\n\
                    3. Raise exchange.retries",
                    operation, attempts
                )
            }
            DeskError::InsufficientData(msg) => {
                format!(
                    "Not enough market data: {}\n\n\
                    💡 The exchange may have returned an empty book or too few candles",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Only timeouts are retried; everything else surfaces immediately
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DeskError::ApiTimeout(_) | DeskError::ConnectionTimeout(_)
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DeskError::ConfigNotFound(_)
            | DeskError::ConfigParse(_)
            | DeskError::ConfigValidation(_) => "config",

            DeskError::ApiTimeout(_)
            | DeskError::ApiConnection(_)
            | DeskError::ApiResponse(_)
            | DeskError::ApiParse(_)
            | DeskError::RetriesExhausted { .. } => "api",

            DeskError::InsufficientData(_) | DeskError::InvalidParameter(_, _) => "calculation",

            DeskError::FileNotFound(_) | DeskError::FileRead(_) | DeskError::FileWrite(_) => "io",

            DeskError::ConnectionTimeout(_) => "network",

            DeskError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for DeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeskError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            DeskError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            DeskError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }

            DeskError::ApiTimeout(msg) => {
                write!(f, "API timeout: {}", msg)
            }
            DeskError::ApiConnection(msg) => {
                write!(f, "API connection error: {}", msg)
            }
            DeskError::ApiResponse(msg) => {
                write!(f, "API response error: {}", msg)
            }
            DeskError::ApiParse(msg) => {
                write!(f, "API parse error: {}", msg)
            }
            DeskError::RetriesExhausted { operation, attempts } => {
                write!(f, "Failed {} after {} retries", operation, attempts)
            }

            DeskError::InsufficientData(msg) => {
                write!(f, "Insufficient data: {}", msg)
            }
            DeskError::InvalidParameter(param, reason) => {
                write!(f, "Invalid parameter '{}': {}", param, reason)
            }

            DeskError::FileNotFound(path) => {
                write!(f, "File not found: {}", path)
            }
            DeskError::FileRead(msg) => {
                write!(f, "File read error: {}", msg)
            }
            DeskError::FileWrite(msg) => {
                write!(f, "File write error: {}", msg)
            }

            DeskError::ConnectionTimeout(msg) => {
                write!(f, "Connection timeout: {}", msg)
            }

            DeskError::Internal(msg) => {
                write!(f, "Internal error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DeskError {}

// Conversion implementations for common error types

impl From<io::Error> for DeskError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DeskError::FileNotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => DeskError::FileRead(err.to_string()),
            io::ErrorKind::TimedOut => DeskError::ConnectionTimeout(err.to_string()),
            _ => DeskError::Internal(format!("IO error: {}", err)),
        }
    }
}

impl From<reqwest::Error> for DeskError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeskError::ApiTimeout(err.to_string())
        } else if err.is_status() {
            DeskError::ApiResponse(err.to_string())
        } else if err.is_decode() {
            DeskError::ApiParse(err.to_string())
        } else {
            DeskError::ApiConnection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        DeskError::ApiParse(format!("JSON parse error: {}", err))
    }
}

impl From<toml::de::Error> for DeskError {
    fn from(err: toml::de::Error) -> Self {
        DeskError::ConfigParse(format!("TOML parse error: {}", err))
    }
}

impl From<crate::config::ConfigError> for DeskError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::FileNotFound(path) => DeskError::ConfigNotFound(path),
            ConfigError::FileRead(msg) => DeskError::FileRead(msg),
            ConfigError::FileWrite(msg) => DeskError::FileWrite(msg),
            ConfigError::Parse(msg) | ConfigError::Serialize(msg) => DeskError::ConfigParse(msg),
            ConfigError::Validation(msg) => DeskError::ConfigValidation(msg),
        }
    }
}

/// Result type alias using DeskError
pub type DeskResult<T> = Result<T, DeskError>;
