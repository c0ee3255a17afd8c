use regex::Regex;
use serde_json::json;

use super::{Params, ValidationFailure, Validator};
use crate::error::ConfigError;

/// Requires a value to match (or not match) a regular expression.
///
/// The pattern is compiled once, when the validator is built. The value is
/// not normalized.
///
/// # Parameters
///
/// Name            | Type   | Default
/// --------------- | ------ | -------
/// `pattern`       | string | required
/// `match`         | bool   | `true` (`false` rejects matching values)
/// `pattern_error` | string | "Value has an invalid format"
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: Regex,
    should_match: bool,
    pattern_error: String,
}

impl RegexValidator {
    /// Kind identifier in the validator registry.
    pub const KIND: &'static str = "regex";

    /// Compiles a validator that requires `pattern` to match.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern).map_err(|err| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;

        Ok(Self {
            pattern,
            should_match: true,
            pattern_error: "Value has an invalid format".to_string(),
        })
    }

    /// Builds a validator from registry parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` if `pattern` is missing, or
    /// `ConfigError::InvalidPattern` if it does not compile.
    pub fn from_params(params: &Params) -> Result<Self, ConfigError> {
        let merged = params.merged(
            Self::KIND,
            json!({
                "match": true,
                "pattern_error": "Value has an invalid format",
            }),
        );

        let mut validator = Self::new(&merged.string("pattern")?)?;
        validator.should_match = merged.bool("match")?;
        validator.pattern_error = merged.string("pattern_error")?;
        Ok(validator)
    }

    /// Inverts the check: matching values are rejected.
    pub fn rejecting(mut self) -> Self {
        self.should_match = false;
        self
    }

    /// Overrides the failure message.
    pub fn pattern_error(mut self, message: impl Into<String>) -> Self {
        self.pattern_error = message.into();
        self
    }
}

impl Validator for RegexValidator {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn validate(&self, value: &mut String) -> Result<(), ValidationFailure> {
        if self.pattern.is_match(value) == self.should_match {
            Ok(())
        } else {
            Err(ValidationFailure::new(&self.pattern_error))
        }
    }
}
