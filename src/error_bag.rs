//! Ordered collection of error messages keyed by field name.

use indexmap::IndexMap;

/// Ordered mapping of error keys to messages.
///
/// Keys are usually parameter names, written by the validation chain. An
/// application may also use namespaced keys (for example `global:` or
/// `form:address.`) and later display a subset with [`ErrorBag::all_like`].
///
/// New keys keep their insertion order. Setting an existing key replaces its
/// message in place.
///
/// # Examples
///
/// ```
/// use dispatch_core::ErrorBag;
///
/// let mut errors = ErrorBag::new();
/// errors.set("form:a", "x");
/// errors.set("form:b", "y");
/// errors.set("other", "z");
///
/// let scoped: Vec<_> = errors.all_like(Some("form:"));
/// assert_eq!(scoped, vec![("form:a", "x"), ("form:b", "y")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBag {
    entries: IndexMap<String, String>,
}

impl ErrorBag {
    /// Creates an empty error bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message for `key`, replacing any previous message.
    pub fn set(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.entries.insert(key.into(), message.into());
    }

    /// Merges several entries; new keys are appended in iteration order.
    pub fn set_merge<I, K, V>(&mut self, errors: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, message) in errors {
            self.set(key, message);
        }
    }

    /// Returns the message registered under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns true if a message is registered under `key`.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of registered messages.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no message has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the message registered under `key`.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Returns entries whose key starts with `prefix`, or all entries for `None`.
    ///
    /// Results keep insertion order.
    pub fn all_like(&self, prefix: Option<&str>) -> Vec<(&str, &str)> {
        self.iter()
            .filter(|(key, _)| prefix.map_or(true, |p| key.starts_with(p)))
            .collect()
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, message)| (key.as_str(), message.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ErrorBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = ErrorBag::new();
        bag.set_merge(iter);
        bag
    }
}
