use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Validator configuration: named values merged over per-kind defaults.
///
/// Keys absent from the supplied map fall back to the defaults. Keys the
/// validator does not know are ignored.
///
/// # Examples
///
/// ```
/// use dispatch_core::validator::Params;
/// use serde_json::json;
///
/// let params = Params::from_value(json!({ "min": 3 })).unwrap();
/// let merged = params.merged("string", json!({ "min": -1, "max": -1 }));
/// assert_eq!(merged.integer("min").unwrap(), Some(3));
/// assert_eq!(merged.integer("max").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Map<String, Value>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds parameters from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Malformed` if `value` is not an object or null.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigError::Malformed(format!(
                "validator parameters must be an object, got {}",
                other
            ))),
        }
    }

    /// Sets a parameter.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns the raw value of a parameter.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Overlays these parameters on `defaults` (a JSON object).
    pub fn merged(&self, kind: &'static str, defaults: Value) -> MergedParams {
        let mut values = match defaults {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in &self.values {
            values.insert(key.clone(), value.clone());
        }
        MergedParams { kind, values }
    }
}

/// Parameters after merging with defaults, with typed accessors.
#[derive(Debug, Clone)]
pub struct MergedParams {
    kind: &'static str,
    values: Map<String, Value>,
}

impl MergedParams {
    fn invalid(&self, key: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidParameter {
            kind: self.kind,
            key: key.to_string(),
            expected,
        }
    }

    /// Reads a boolean parameter.
    pub fn bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self.values.get(key) {
            Some(Value::Bool(b)) => Ok(*b),
            _ => Err(self.invalid(key, "a boolean")),
        }
    }

    /// Reads a string parameter.
    pub fn string(&self, key: &str) -> Result<String, ConfigError> {
        match self.values.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            _ => Err(self.invalid(key, "a string")),
        }
    }

    /// Reads an integer bound; negative values and `null` mean unbounded.
    pub fn integer(&self, key: &str) -> Result<Option<usize>, ConfigError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(v) if v < 0 => Ok(None),
                Some(v) => usize::try_from(v)
                    .map(Some)
                    .map_err(|_| self.invalid(key, "an integer")),
                None => Err(self.invalid(key, "an integer")),
            },
            _ => Err(self.invalid(key, "an integer")),
        }
    }

    /// Reads a numeric bound; `null` means unbounded.
    pub fn number(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "a number")),
            _ => Err(self.invalid(key, "a number")),
        }
    }

    /// Reads a character set given as a string or an array of one-character strings.
    pub fn chars(&self, key: &str) -> Result<Vec<char>, ConfigError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(s.chars().collect()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item.as_str() {
                    Some(s) if s.chars().count() == 1 => {
                        s.chars().next().ok_or_else(|| self.invalid(key, "single characters"))
                    }
                    _ => Err(self.invalid(key, "single characters")),
                })
                .collect(),
            _ => Err(self.invalid(key, "a string or an array of characters")),
        }
    }
}
