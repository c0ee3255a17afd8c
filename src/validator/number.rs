use serde_json::json;

use super::{Params, ValidationFailure, Validator};
use crate::error::ConfigError;

/// Constrains a value to a numeric range.
///
/// The value is trimmed (unless `trim` is false), parsed as a number, and
/// compared against the inclusive `min`/`max` bounds. With `integer = true`
/// fractional input is rejected with `nan_error`.
///
/// # Parameters
///
/// Name        | Type   | Default
/// ----------- | ------ | -------
/// `min`       | number | `null` (unbounded)
/// `max`       | number | `null` (unbounded)
/// `integer`   | bool   | `false`
/// `trim`      | bool   | `true`
/// `nan_error` | string | "Value is not a number"
/// `min_error` | string | "Value is too small"
/// `max_error` | string | "Value is too large"
#[derive(Debug, Clone)]
pub struct NumberValidator {
    min: Option<f64>,
    max: Option<f64>,
    integer: bool,
    trim: bool,
    nan_error: String,
    min_error: String,
    max_error: String,
}

impl NumberValidator {
    /// Kind identifier in the validator registry.
    pub const KIND: &'static str = "number";

    /// Creates a validator accepting any finite number.
    pub fn new() -> Self {
        Self {
            min: None,
            max: None,
            integer: false,
            trim: true,
            nan_error: "Value is not a number".to_string(),
            min_error: "Value is too small".to_string(),
            max_error: "Value is too large".to_string(),
        }
    }

    /// Builds a validator from registry parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` for a parameter of the wrong type.
    pub fn from_params(params: &Params) -> Result<Self, ConfigError> {
        let merged = params.merged(
            Self::KIND,
            json!({
                "min": null,
                "max": null,
                "integer": false,
                "trim": true,
                "nan_error": "Value is not a number",
                "min_error": "Value is too small",
                "max_error": "Value is too large",
            }),
        );

        Ok(Self {
            min: merged.number("min")?,
            max: merged.number("max")?,
            integer: merged.bool("integer")?,
            trim: merged.bool("trim")?,
            nan_error: merged.string("nan_error")?,
            min_error: merged.string("min_error")?,
            max_error: merged.string("max_error")?,
        })
    }

    /// Sets the inclusive lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the inclusive upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Requires a whole number.
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    fn parse(&self, value: &str) -> Option<f64> {
        if self.integer {
            return value.parse::<i64>().ok().map(|n| n as f64);
        }
        value.parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

impl Default for NumberValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for NumberValidator {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn validate(&self, value: &mut String) -> Result<(), ValidationFailure> {
        if self.trim {
            let trimmed = value.trim();
            if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }

        let number = self
            .parse(value)
            .ok_or_else(|| ValidationFailure::new(&self.nan_error))?;

        if self.min.is_some_and(|min| number < min) {
            return Err(ValidationFailure::new(&self.min_error));
        }
        if self.max.is_some_and(|max| number > max) {
            return Err(ValidationFailure::new(&self.max_error));
        }
        Ok(())
    }
}
