//! Typed error handling
//!
//! The listing pipeline itself never fails: bad input degrades to neutral
//! defaults. The error types here cover the surfaces that do touch the
//! outside world.
//!
//! # Error Categories
//!
//! - [`PreferenceError`]: Errors reading or writing saved listing preferences
//! - [`FetchError`]: Errors from the property backend
//! - [`ConfigError`]: Errors related to configuration parsing
//! - [`ReportError`]: Errors rendering printable reports
//!
//! Fallible functions return `anyhow::Result`; the typed error is attached
//! as the root cause so callers can match on it:
//!
//! ```rust,ignore
//! match store.save("u1", &prefs).await {
//!     Ok(()) => {}
//!     Err(e) => match e.downcast_ref::<PreferenceError>() {
//!         Some(PreferenceError::Serialization { .. }) => { /* ... */ }
//!         _ => eprintln!("Other error: {}", e),
//!     },
//! }
//! ```

use std::fmt;

/// The main error type for this crate
#[derive(Debug)]
pub enum EstateError {
    /// Preference store errors
    Preference(PreferenceError),

    /// Backend fetch errors
    Fetch(FetchError),

    /// Configuration errors
    Config(ConfigError),

    /// Report rendering errors
    Report(ReportError),
}

impl fmt::Display for EstateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstateError::Preference(e) => write!(f, "{}", e),
            EstateError::Fetch(e) => write!(f, "{}", e),
            EstateError::Config(e) => write!(f, "{}", e),
            EstateError::Report(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EstateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EstateError::Preference(e) => Some(e),
            EstateError::Fetch(e) => Some(e),
            EstateError::Config(e) => Some(e),
            EstateError::Report(e) => Some(e),
        }
    }
}

impl EstateError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            EstateError::Preference(e) => e.error_code(),
            EstateError::Fetch(e) => e.error_code(),
            EstateError::Config(_) => "CONFIG_ERROR",
            EstateError::Report(_) => "REPORT_ERROR",
        }
    }
}

// =============================================================================
// Preference Errors
// =============================================================================

/// Errors related to saved listing preferences
#[derive(Debug)]
pub enum PreferenceError {
    /// The backing key-value store failed
    Storage { key: String, message: String },

    /// Preferences could not be serialized for saving
    Serialization { user_id: String, message: String },
}

impl fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceError::Storage { key, message } => {
                write!(f, "Preference storage failed for '{}': {}", key, message)
            }
            PreferenceError::Serialization { user_id, message } => {
                write!(
                    f,
                    "Failed to serialize preferences for user '{}': {}",
                    user_id, message
                )
            }
        }
    }
}

impl std::error::Error for PreferenceError {}

impl PreferenceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PreferenceError::Storage { .. } => "PREFERENCE_STORAGE_ERROR",
            PreferenceError::Serialization { .. } => "PREFERENCE_SERIALIZATION_ERROR",
        }
    }
}

impl From<PreferenceError> for EstateError {
    fn from(err: PreferenceError) -> Self {
        EstateError::Preference(err)
    }
}

// =============================================================================
// Fetch Errors
// =============================================================================

/// Errors returned while loading records from the backend
#[derive(Debug)]
pub enum FetchError {
    /// The request could not be sent or the connection failed
    Transport { resource: String, message: String },

    /// The backend answered with a non-success status
    Status { resource: String, status: u16 },

    /// The response body was not the expected shape
    Decode { resource: String, message: String },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport { resource, message } => {
                write!(f, "Request to {} failed: {}", resource, message)
            }
            FetchError::Status { resource, status } => {
                write!(f, "{} responded with status {}", resource, status)
            }
            FetchError::Decode { resource, message } => {
                write!(f, "Invalid response from {}: {}", resource, message)
            }
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    pub fn error_code(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "FETCH_TRANSPORT_ERROR",
            FetchError::Status { .. } => "FETCH_STATUS_ERROR",
            FetchError::Decode { .. } => "FETCH_DECODE_ERROR",
        }
    }
}

impl From<FetchError> for EstateError {
    fn from(err: FetchError) -> Self {
        EstateError::Fetch(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for EstateError {
    fn from(err: ConfigError) -> Self {
        EstateError::Config(err)
    }
}

// =============================================================================
// Report Errors
// =============================================================================

/// Errors produced while rendering a printable report
#[derive(Debug)]
pub enum ReportError {
    /// The report template failed to compile
    Template { message: String },

    /// Rendering failed
    Render { message: String },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Template { message } => {
                write!(f, "Invalid report template: {}", message)
            }
            ReportError::Render { message } => write!(f, "Failed to render report: {}", message),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<ReportError> for EstateError {
    fn from(err: ReportError) -> Self {
        EstateError::Report(err)
    }
}
