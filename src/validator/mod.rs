//! Single-field validators and the registry that builds them by kind.
//!
//! A [`Validator`] checks one text value and may normalize it in place. New
//! kinds plug in by implementing the trait and registering a factory with a
//! [`ValidatorRegistry`]; the [`ValidationChain`](crate::ValidationChain)
//! never needs to know about concrete kinds.

mod number;
mod params;
mod pattern;
mod registry;
mod string;

use std::fmt;

pub use number::NumberValidator;
pub use params::{MergedParams, Params};
pub use pattern::RegexValidator;
pub use registry::{ValidatorFactory, ValidatorRegistry};
pub use string::StringValidator;

/// A failed validation.
///
/// Carries the validator's own message when it has one; otherwise the chain
/// substitutes its generic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    message: Option<String>,
}

impl ValidationFailure {
    /// Creates a failure with a specific message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Creates a failure without a message.
    pub fn unspecified() -> Self {
        Self { message: None }
    }

    /// Returns the validator's message, if it set one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "validation failed: {}", message),
            None => write!(f, "validation failed"),
        }
    }
}

/// A constraint on a single parameter value.
///
/// # Invariants
///
/// Implementations:
/// - receive the current value and may rewrite it (trim, canonicalize);
///   the rewritten value is what later validators and stages see
/// - return the first failing condition only
/// - must not panic on any input
///
/// # Examples
///
/// ```
/// use dispatch_core::validator::{ValidationFailure, Validator};
///
/// #[derive(Debug)]
/// struct Lowercase;
///
/// impl Validator for Lowercase {
///     fn kind(&self) -> &'static str {
///         "lowercase"
///     }
///
///     fn validate(&self, value: &mut String) -> Result<(), ValidationFailure> {
///         *value = value.to_lowercase();
///         Ok(())
///     }
/// }
///
/// let mut value = "MiXeD".to_string();
/// Lowercase.validate(&mut value).unwrap();
/// assert_eq!(value, "mixed");
/// ```
pub trait Validator: fmt::Debug + Send + Sync {
    /// Kind identifier this validator is registered under.
    fn kind(&self) -> &'static str;

    /// Validates `value`, normalizing it in place.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailure` when the value violates the constraint.
    fn validate(&self, value: &mut String) -> Result<(), ValidationFailure>;
}
