use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{NumberValidator, Params, RegexValidator, StringValidator, Validator};
use crate::error::ConfigError;

/// Builds a validator from its parameters.
pub type ValidatorFactory =
    Arc<dyn Fn(&Params) -> Result<Box<dyn Validator>, ConfigError> + Send + Sync>;

/// Maps validator kind identifiers to factories.
///
/// The registry is populated once at startup and then shared read-only by
/// every dispatch. Building an unknown kind is an error, not a silent skip.
///
/// # Examples
///
/// ```
/// use dispatch_core::validator::{Params, ValidatorRegistry};
/// use dispatch_core::ConfigError;
///
/// let registry = ValidatorRegistry::with_builtin();
///
/// let validator = registry.build("string", &Params::new().set("max", 8)).unwrap();
/// assert_eq!(validator.kind(), "string");
///
/// assert!(matches!(
///     registry.build("ssn", &Params::new()),
///     Err(ConfigError::UnknownValidator { .. })
/// ));
/// ```
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    factories: HashMap<String, ValidatorFactory>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the `string`, `number` and `regex` kinds.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(StringValidator::KIND, |params| {
            Ok(Box::new(StringValidator::from_params(params)?))
        });
        registry.register(NumberValidator::KIND, |params| {
            Ok(Box::new(NumberValidator::from_params(params)?))
        });
        registry.register(RegexValidator::KIND, |params| {
            Ok(Box::new(RegexValidator::from_params(params)?))
        });
        registry
    }

    /// Registers a factory, replacing any previous factory for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&Params) -> Result<Box<dyn Validator>, ConfigError> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
    }

    /// Returns true if a factory is registered for `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Builds a validator of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownValidator` for an unregistered kind, or the
    /// factory's error for invalid parameters.
    pub fn build(&self, kind: &str, params: &Params) -> Result<Box<dyn Validator>, ConfigError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownValidator {
                kind: kind.to_string(),
            })?;
        factory(params)
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("ValidatorRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::ValidationFailure;

    #[derive(Debug)]
    struct Uppercase;

    impl Validator for Uppercase {
        fn kind(&self) -> &'static str {
            "uppercase"
        }

        fn validate(&self, value: &mut String) -> Result<(), ValidationFailure> {
            *value = value.to_uppercase();
            Ok(())
        }
    }

    #[test]
    fn builtin_kinds_are_registered() {
        let registry = ValidatorRegistry::with_builtin();

        assert!(registry.contains("string"));
        assert!(registry.contains("number"));
        assert!(registry.contains("regex"));
        assert!(!registry.contains("email"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let registry = ValidatorRegistry::new();
        let err = registry.build("string", &Params::new()).unwrap_err();

        assert_eq!(
            err,
            ConfigError::UnknownValidator {
                kind: "string".to_string()
            }
        );
    }

    #[test]
    fn factory_errors_propagate() {
        let registry = ValidatorRegistry::with_builtin();
        let err = registry.build("regex", &Params::new()).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidParameter { kind: "regex", .. }));
    }

    #[test]
    fn custom_kinds_plug_in() {
        let mut registry = ValidatorRegistry::with_builtin();
        registry.register("uppercase", |_| Ok(Box::new(Uppercase)));

        let validator = registry.build("uppercase", &Params::new()).unwrap();
        let mut value = "shout".to_string();
        validator.validate(&mut value).unwrap();

        assert_eq!(value, "SHOUT");
    }

    #[test]
    fn debug_lists_kinds() {
        let registry = ValidatorRegistry::with_builtin();
        let debug = format!("{:?}", registry);

        assert!(debug.contains("number"));
        assert!(debug.contains("regex"));
        assert!(debug.contains("string"));
    }
}
