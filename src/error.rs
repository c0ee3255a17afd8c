use std::fmt;

use crate::dispatch::Stage;

/// Errors that abort a dispatch.
///
/// Validation failures and authorization denials are not errors: they are
/// reported through the request's error bag and [`DispatchOutcome`] values.
/// A `DispatchError` means the request could not be served at all and the
/// serving loop should answer with a 5xx-class failure.
///
/// [`DispatchOutcome`]: crate::DispatchOutcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The resolved response target has no registered responder.
    MissingResponder {
        /// Unit of the resolved target
        unit: String,
        /// Action of the resolved target
        action: String,
        /// Response name of the resolved target
        response: String,
    },
    /// The dispatch was cancelled before the given stage ran.
    Cancelled {
        /// The stage that was about to run
        stage: Stage,
    },
    /// The action registered an invalid validation.
    Config(ConfigError),
}

impl DispatchError {
    /// Returns the HTTP status code a serving loop should answer with.
    ///
    /// # Examples
    ///
    /// ```
    /// use dispatch_core::DispatchError;
    ///
    /// let err = DispatchError::MissingResponder {
    ///     unit: "news".to_string(),
    ///     action: "view".to_string(),
    ///     response: "success".to_string(),
    /// };
    /// assert_eq!(err.status_code(), 500);
    /// ```
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::Cancelled { .. } => 503,
            DispatchError::MissingResponder { .. } | DispatchError::Config(_) => 500,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::MissingResponder {
                unit,
                action,
                response,
            } => write!(
                f,
                "{}\\{} does not have a responder for '{}'",
                unit, action, response
            ),
            DispatchError::Cancelled { stage } => {
                write!(f, "dispatch cancelled before {} stage", stage)
            }
            DispatchError::Config(err) => write!(f, "configuration error: {}", err),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for DispatchError {
    fn from(err: ConfigError) -> Self {
        DispatchError::Config(err)
    }
}

/// Configuration errors raised while building validators or loading settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No factory is registered for the validator kind.
    UnknownValidator {
        /// The requested kind identifier
        kind: String,
    },
    /// A validator parameter has the wrong type or is missing.
    InvalidParameter {
        /// Validator kind being configured
        kind: &'static str,
        /// Offending parameter key
        key: String,
        /// Description of the accepted value
        expected: &'static str,
    },
    /// A pattern failed to compile.
    InvalidPattern {
        /// The pattern source
        pattern: String,
        /// Compiler diagnostic
        reason: String,
    },
    /// A configuration document could not be parsed.
    Malformed(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownValidator { kind } => {
                write!(f, "validator kind '{}' is not registered", kind)
            }
            ConfigError::InvalidParameter {
                kind,
                key,
                expected,
            } => write!(
                f,
                "{} validator parameter '{}' must be {}",
                kind, key, expected
            ),
            ConfigError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid pattern '{}': {}", pattern, reason)
            }
            ConfigError::Malformed(reason) => write!(f, "malformed configuration: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}
