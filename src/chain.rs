//! Per-field validator chains.

use indexmap::IndexMap;

use crate::config::DispatchConfig;
use crate::error::ConfigError;
use crate::request::{ParamValue, Request};
use crate::validator::{Params, ValidationFailure, Validator, ValidatorRegistry};

/// Validators and required status for one parameter.
#[derive(Debug)]
struct FieldChain {
    required: bool,
    message: String,
    validators: Vec<Box<dyn Validator>>,
}

/// Ordered set of per-field validator chains.
///
/// An action registers its validations on a fresh chain for every dispatch.
/// [`ValidationChain::execute`] then checks every field, in registration
/// order, and records one error per failing field on the request.
///
/// For each field:
/// - validators run top to bottom against the current value and stop at the
///   first failure, whose message becomes the field's error
/// - a list value is validated element by element
/// - a normalized value replaces the submitted one (present fields only)
/// - if the field is required and its value is absent, an empty string or
///   an empty list, the required message becomes the field's error
///
/// # Examples
///
/// ```
/// use dispatch_core::validator::{Params, ValidatorRegistry};
/// use dispatch_core::{DispatchConfig, ParamValue, Request, ValidationChain};
///
/// let registry = ValidatorRegistry::with_builtin();
/// let config = DispatchConfig::default();
/// let mut chain = ValidationChain::new(&registry, &config);
///
/// chain.add_validation("title", "string", &Params::new().set("max", 5)).unwrap();
/// chain.set_required("title", true, None);
/// chain.set_required("body", true, Some("Please write something"));
///
/// let mut request = Request::new("req-1", [("title", ParamValue::from("far too long"))]);
/// assert!(!chain.execute(&mut request));
/// assert_eq!(request.error("title"), Some("Value is too long"));
/// assert_eq!(request.error("body"), Some("Please write something"));
/// ```
#[derive(Debug)]
pub struct ValidationChain<'a> {
    registry: &'a ValidatorRegistry,
    required_message: &'a str,
    default_message: &'a str,
    fields: IndexMap<String, FieldChain>,
}

impl<'a> ValidationChain<'a> {
    /// Creates an empty chain that builds validators through `registry`.
    pub fn new(registry: &'a ValidatorRegistry, config: &'a DispatchConfig) -> Self {
        Self {
            registry,
            required_message: &config.required_message,
            default_message: &config.default_validator_message,
            fields: IndexMap::new(),
        }
    }

    fn field(&mut self, name: String) -> &mut FieldChain {
        let message = self.required_message;
        self.fields.entry(name).or_insert_with(|| FieldChain {
            required: false,
            message: message.to_string(),
            validators: Vec::new(),
        })
    }

    /// Appends a validator to a field's chain.
    ///
    /// The first registration for a field leaves it optional unless
    /// [`set_required`](Self::set_required) was already called.
    pub fn register(&mut self, name: impl Into<String>, validator: Box<dyn Validator>) {
        self.field(name.into()).validators.push(validator);
    }

    /// Builds a validator of `kind` through the registry and appends it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownValidator` if `kind` is not registered,
    /// or the validator's own error for invalid parameters. Nothing is added
    /// on error.
    pub fn add_validation(
        &mut self,
        name: impl Into<String>,
        kind: &str,
        params: &Params,
    ) -> Result<(), ConfigError> {
        let validator = self.registry.build(kind, params)?;
        self.register(name, validator);
        Ok(())
    }

    /// Sets whether a field is required, and the message used when it is missing.
    ///
    /// An absent or empty message falls back to the configured default
    /// ("Required"). The field's validators are left untouched.
    pub fn set_required(&mut self, name: impl Into<String>, required: bool, message: Option<&str>) {
        let message = match message {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => self.required_message.to_string(),
        };
        let field = self.field(name.into());
        field.required = required;
        field.message = message;
    }

    /// Returns the number of fields with a chain or a required flag.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Runs every field chain against the request.
    ///
    /// All fields are checked, so the request's error bag collects every
    /// failure in one pass. Returns true iff no field produced an error.
    pub fn execute(&self, request: &mut Request) -> bool {
        let mut success = true;

        for (name, field) in &self.fields {
            let submitted = request.parameter(name).cloned();
            let mut value = submitted.clone();

            if let Err(failure) = run_validators(&field.validators, &mut value) {
                let message = failure.message().unwrap_or(self.default_message);
                request.set_error(name.as_str(), message);
                success = false;
            }

            if let (Some(before), Some(after)) = (&submitted, &value) {
                if before != after {
                    request.normalize_parameter(name, after.clone());
                }
            }

            if field.required && value.as_ref().map_or(true, ParamValue::is_empty) {
                request.set_error(name.as_str(), field.message.as_str());
                success = false;
            }
        }

        success
    }
}

/// Runs validators in order, stopping at the first failure.
///
/// An absent value is validated as empty text but stays absent.
fn run_validators(
    validators: &[Box<dyn Validator>],
    value: &mut Option<ParamValue>,
) -> Result<(), ValidationFailure> {
    for validator in validators {
        match value {
            None => validator.validate(&mut String::new())?,
            Some(ParamValue::Text(text)) => validator.validate(text)?,
            Some(ParamValue::List(items)) => {
                for item in items.iter_mut() {
                    validator.validate(item)?;
                }
            }
        }
    }
    Ok(())
}
