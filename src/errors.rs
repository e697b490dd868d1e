//! Shared error types for measure computation and period resolution.
//!
//! Errors fall in two families:
//!
//! - **User-fixable**: a malformed "new code" setting. The message is meant for
//!   a project administrator and says what to correct.
//! - **Fatal**: stored data no longer matches what the analysis references
//!   (a deleted baseline analysis, no analysis at all) or a collaborator
//!   contract was broken. These abort the analysis and are never retried.
//!
//! Suppressed measures (zero denominators, absent period, unit test files)
//! are not errors and never surface here.

use thiserror::Error;

/// Main error type for formulary operations
#[derive(Debug, Error)]
pub enum Error {
    /// The configured new code period can not be interpreted
    #[error(
        "Invalid new code period '{value}': {reason}. Please contact a project administrator to correct this setting"
    )]
    InvalidNewCodePeriod { value: String, reason: String },

    /// Configuration file or option errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Data integrity or call-order violations
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Metric lookup by key failed
    #[error("Metric with key '{0}' does not exist")]
    UnknownMetric(String),

    /// A formula was asked for a metric it does not produce
    #[error("Unsupported metric '{0}'")]
    UnsupportedMetric(String),

    /// A measure value was read as the wrong type
    #[error("Value can not be converted to {expected} because current value type is {actual}")]
    ValueType {
        expected: &'static str,
        actual: &'static str,
    },

    /// Malformed measure data
    #[error("Parse error: {0}")]
    Parse(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create an invalid new code period error
    pub fn invalid_period(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNewCodePeriod {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an illegal state error
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    /// Whether a project administrator can fix this by changing settings.
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::InvalidNewCodePeriod { .. } | Self::Configuration(_) | Self::Toml(_)
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
