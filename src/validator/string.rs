use std::collections::HashSet;

use serde_json::json;

use super::{Params, ValidationFailure, Validator};
use crate::error::ConfigError;

/// Constrains a value's length and character set.
///
/// The value is optionally trimmed (and the trimmed form written back), then:
/// 1. rejected if shorter than `min` code points (`min_error`)
/// 2. rejected if longer than `max` code points (`max_error`)
/// 3. scanned character by character against `chars`: with `allowed = true`
///    every character must be in the set, otherwise none may be (`chars_error`)
///
/// The first failing condition wins. An empty character set skips step 3.
///
/// # Parameters
///
/// Name          | Type            | Default
/// ------------- | --------------- | -------
/// `allowed`     | bool            | `false`
/// `chars`       | string or array | empty
/// `min`         | integer         | `-1` (unbounded)
/// `max`         | integer         | `-1` (unbounded)
/// `trim`        | bool            | `true`
/// `min_error`   | string          | "Value is too short"
/// `max_error`   | string          | "Value is too long"
/// `chars_error` | string          | "Value contains an invalid character"
///
/// # Examples
///
/// ```
/// use dispatch_core::validator::{StringValidator, Validator};
///
/// let validator = StringValidator::new().min(2).max(5).allow_only("abc");
///
/// let mut value = "  abc ".to_string();
/// assert!(validator.validate(&mut value).is_ok());
/// assert_eq!(value, "abc");
///
/// let mut value = "abd".to_string();
/// let failure = validator.validate(&mut value).unwrap_err();
/// assert_eq!(failure.message(), Some("Value contains an invalid character"));
/// ```
#[derive(Debug, Clone)]
pub struct StringValidator {
    allowed: bool,
    chars: HashSet<char>,
    min: Option<usize>,
    max: Option<usize>,
    trim: bool,
    min_error: String,
    max_error: String,
    chars_error: String,
}

impl StringValidator {
    /// Kind identifier in the validator registry.
    pub const KIND: &'static str = "string";

    /// Creates a validator with default parameters (accepts everything, trims).
    pub fn new() -> Self {
        Self {
            allowed: false,
            chars: HashSet::new(),
            min: None,
            max: None,
            trim: true,
            min_error: "Value is too short".to_string(),
            max_error: "Value is too long".to_string(),
            chars_error: "Value contains an invalid character".to_string(),
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
                "allowed": false,
                "chars": [],
                "chars_error": "Value contains an invalid character",
                "max": -1,
                "max_error": "Value is too long",
                "min": -1,
                "min_error": "Value is too short",
                "trim": true,
            }),
        );

        Ok(Self {
            allowed: merged.bool("allowed")?,
            chars: merged.chars("chars")?.into_iter().collect(),
            min: merged.integer("min")?,
            max: merged.integer("max")?,
            trim: merged.bool("trim")?,
            min_error: merged.string("min_error")?,
            max_error: merged.string("max_error")?,
            chars_error: merged.string("chars_error")?,
        })
    }

    /// Sets the minimum length in code points.
    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the maximum length in code points.
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Permits only the given characters.
    pub fn allow_only(mut self, chars: &str) -> Self {
        self.allowed = true;
        self.chars = chars.chars().collect();
        self
    }

    /// Forbids the given characters.
    pub fn deny(mut self, chars: &str) -> Self {
        self.allowed = false;
        self.chars = chars.chars().collect();
        self
    }

    /// Enables or disables trimming before measurement.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Overrides the message for values below `min`.
    pub fn min_error(mut self, message: impl Into<String>) -> Self {
        self.min_error = message.into();
        self
    }

    /// Overrides the message for values above `max`.
    pub fn max_error(mut self, message: impl Into<String>) -> Self {
        self.max_error = message.into();
        self
    }

    /// Overrides the message for rejected characters.
    pub fn chars_error(mut self, message: impl Into<String>) -> Self {
        self.chars_error = message.into();
        self
    }

    fn check_characters(&self, value: &str) -> Result<(), ValidationFailure> {
        if self.chars.is_empty() {
            return Ok(());
        }
        // Allow-list rejects non-members, deny-list rejects members.
        if value.chars().any(|c| self.chars.contains(&c) != self.allowed) {
            return Err(ValidationFailure::new(&self.chars_error));
        }
        Ok(())
    }
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for StringValidator {
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

        let length = value.chars().count();

        if self.min.is_some_and(|min| length < min) {
            return Err(ValidationFailure::new(&self.min_error));
        }

        if self.max.is_some_and(|max| length > max) {
            return Err(ValidationFailure::new(&self.max_error));
        }

        self.check_characters(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(validator: &StringValidator, input: &str) -> (Result<(), ValidationFailure>, String) {
        let mut value = input.to_string();
        let result = validator.validate(&mut value);
        (result, value)
    }

    #[test]
    fn defaults_accept_anything() {
        let validator = StringValidator::new();
        assert!(run(&validator, "").0.is_ok());
        assert!(run(&validator, "any text at all").0.is_ok());
    }

    #[test]
    fn trims_and_writes_back() {
        let (result, value) = run(&StringValidator::new(), "\t hello \n");
        assert!(result.is_ok());
        assert_eq!(value, "hello");
    }

    #[test]
    fn no_trim_measures_raw_length() {
        let validator = StringValidator::new().trim(false).max(3);
        let (result, value) = run(&validator, " ab ");

        assert_eq!(result.unwrap_err().message(), Some("Value is too long"));
        assert_eq!(value, " ab ");
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let validator = StringValidator::new().min(2).max(4);

        assert!(run(&validator, "ab").0.is_ok());
        assert!(run(&validator, "abcd").0.is_ok());
        assert_eq!(
            run(&validator, "a").0.unwrap_err().message(),
            Some("Value is too short")
        );
        assert_eq!(
            run(&validator, "abcde").0.unwrap_err().message(),
            Some("Value is too long")
        );
    }

    #[test]
    fn length_counts_code_points() {
        let validator = StringValidator::new().max(3);
        // 3 code points, 9 bytes
        assert!(run(&validator, "日本語").0.is_ok());
        assert!(run(&validator, "日本語!").0.is_err());
    }

    #[test]
    fn allow_list() {
        let validator = StringValidator::new().allow_only("ab");

        assert!(run(&validator, "ab").0.is_ok());
        assert_eq!(
            run(&validator, "ac").0.unwrap_err().message(),
            Some("Value contains an invalid character")
        );
    }

    #[test]
    fn deny_list() {
        let validator = StringValidator::new().deny("ab");

        assert!(run(&validator, "ab").0.is_err());
        assert!(run(&validator, "cd").0.is_ok());
    }

    #[test]
    fn first_failing_condition_wins() {
        let validator = StringValidator::new()
            .min(3)
            .allow_only("x")
            .min_error("short")
            .chars_error("bad char");

        // Too short and invalid characters: length check runs first.
        assert_eq!(run(&validator, "ab").0.unwrap_err().message(), Some("short"));
    }

    #[test]
    fn from_params_applies_overrides() {
        let params = Params::new()
            .set("min", 2)
            .set("max", 3)
            .set("min_error", "Too short!")
            .set("allowed", true)
            .set("chars", serde_json::json!(["a", "b", "c"]));
        let validator = StringValidator::from_params(&params).unwrap();

        assert_eq!(run(&validator, "a").0.unwrap_err().message(), Some("Too short!"));
        assert_eq!(
            run(&validator, "abcd").0.unwrap_err().message(),
            Some("Value is too long")
        );
        assert!(run(&validator, "cab").0.is_ok());
        assert!(run(&validator, "cad").0.is_err());
    }

    #[test]
    fn from_params_treats_negative_bounds_as_unbounded() {
        let params = Params::new().set("min", -1).set("max", -5);
        let validator = StringValidator::from_params(&params).unwrap();

        assert!(run(&validator, "").0.is_ok());
        assert!(run(&validator, &"x".repeat(1000)).0.is_ok());
    }

    #[test]
    fn from_params_rejects_bad_types() {
        let params = Params::new().set("trim", "yes");
        assert!(StringValidator::from_params(&params).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a value passes the bounds iff its trimmed code-point length is within them
            #[test]
            fn proptest_bounds_match_trimmed_length(
                input in "\\PC{0,12}",
                min in 0usize..6,
                span in 0usize..6,
            ) {
                let max = min + span;
                let validator = StringValidator::new().min(min).max(max);
                let length = input.trim().chars().count();

                let mut value = input.clone();
                let result = validator.validate(&mut value);

                prop_assert_eq!(result.is_ok(), length >= min && length <= max);
                prop_assert_eq!(value.as_str(), input.trim());
            }

            /// Property: allow-list and deny-list over the same set disagree on non-empty input
            #[test]
            fn proptest_allow_and_deny_are_complementary_on_single_chars(c in any::<char>()) {
                prop_assume!(!c.is_whitespace());
                let allow = StringValidator::new().allow_only("ab");
                let deny = StringValidator::new().deny("ab");

                let mut a = c.to_string();
                let mut d = c.to_string();
                prop_assert_ne!(allow.validate(&mut a).is_ok(), deny.validate(&mut d).is_ok());
            }
        }
    }
}
