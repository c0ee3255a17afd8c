use serde::Deserialize;

use crate::error::ConfigError;

/// What to do when a secure action runs without an authorization handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingAuthorizationPolicy {
    /// Log a warning and run the action as if authorized.
    #[default]
    WarnAndAllow,
    /// Log a warning and treat the request as denied.
    Deny,
}

/// Process-wide dispatch settings.
///
/// Loaded once at startup and read-only while requests are served.
///
/// # Examples
///
/// ```
/// use dispatch_core::{DispatchConfig, MissingAuthorizationPolicy};
///
/// let config = DispatchConfig::from_json(
///     r#"{ "on_missing_authorization_handler": "deny" }"#,
/// ).unwrap();
///
/// assert_eq!(config.on_missing_authorization_handler, MissingAuthorizationPolicy::Deny);
/// assert_eq!(config.required_message, "Required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Policy for secure actions when no authorization handler is registered
    pub on_missing_authorization_handler: MissingAuthorizationPolicy,
    /// Error recorded for a required field that is missing or empty
    pub required_message: String,
    /// Error recorded when a validator fails without a message of its own
    pub default_validator_message: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            on_missing_authorization_handler: MissingAuthorizationPolicy::default(),
            required_message: "Required".to_string(),
            default_validator_message: "Invalid value".to_string(),
        }
    }
}

impl DispatchConfig {
    /// Parses a JSON configuration document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Malformed` for invalid JSON, unknown keys or
    /// unknown policy names.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Malformed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_fail_open() {
        let config = DispatchConfig::default();
        assert_eq!(
            config.on_missing_authorization_handler,
            MissingAuthorizationPolicy::WarnAndAllow
        );
        assert_eq!(config.default_validator_message, "Invalid value");
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = DispatchConfig::from_json("{}").unwrap();
        assert_eq!(config, DispatchConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = DispatchConfig::from_json(
            r#"{
                "on_missing_authorization_handler": "warn-and-allow",
                "required_message": "This field is required",
                "default_validator_message": "Bad value"
            }"#,
        )
        .unwrap();

        assert_eq!(config.required_message, "This field is required");
        assert_eq!(config.default_validator_message, "Bad value");
    }

    #[test]
    fn rejects_unknown_keys_and_policies() {
        assert!(matches!(
            DispatchConfig::from_json(r#"{ "colour": "blue" }"#),
            Err(ConfigError::Malformed(_))
        ));
        assert!(matches!(
            DispatchConfig::from_json(r#"{ "on_missing_authorization_handler": "maybe" }"#),
            Err(ConfigError::Malformed(_))
        ));
    }
}
