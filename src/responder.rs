//! Responders, renderers and the registry that resolves them.

use std::collections::HashMap;
use std::fmt;

use crate::request::Request;

/// Fully resolved (unit, action, response) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseTarget {
    /// Unit (namespace) of the responder
    pub unit: String,
    /// Action the responder belongs to
    pub action: String,
    /// Response name
    pub response: String,
}

impl ResponseTarget {
    /// Creates a target.
    pub fn new(
        unit: impl Into<String>,
        action: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            unit: unit.into(),
            action: action.into(),
            response: response.into(),
        }
    }
}

impl fmt::Display for ResponseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.unit, self.action, self.response)
    }
}

/// Produces output for a request, e.g. by executing a template.
pub trait Renderer {
    /// Name recorded on the request for downstream use.
    fn name(&self) -> &str;

    /// Renders the output.
    fn execute(&mut self, request: &mut Request);
}

/// Prepares the output of one response target.
pub trait Responder {
    /// Prepares the responder. On false, `execute` is skipped but `cleanup` still runs.
    fn initialize(&mut self, _request: &mut Request) -> bool {
        true
    }

    /// Prepares data and returns the renderer to run, if any.
    fn execute(&mut self, request: &mut Request) -> Option<Box<dyn Renderer>>;

    /// Releases resources. Always called once the responder was obtained.
    fn cleanup(&mut self, _request: &mut Request) {}
}

/// Looks up responders by response target.
///
/// Shared read-only by every dispatch.
pub trait ResponderRegistry: Send + Sync {
    /// Returns true if a responder is registered for `target`.
    fn responder_exists(&self, target: &ResponseTarget) -> bool;

    /// Creates the responder for `target`.
    fn responder(&self, target: &ResponseTarget) -> Option<Box<dyn Responder>>;
}

type ResponderFactory = Box<dyn Fn() -> Box<dyn Responder> + Send + Sync>;

/// A [`ResponderRegistry`] backed by a map of factories.
///
/// # Examples
///
/// ```
/// use dispatch_core::{Renderer, Request, Responder, ResponderRegistry, ResponderTable, ResponseTarget};
///
/// struct Success;
///
/// impl Responder for Success {
///     fn execute(&mut self, _request: &mut Request) -> Option<Box<dyn Renderer>> {
///         None
///     }
/// }
///
/// let mut table = ResponderTable::new();
/// table.register("news", "view", "success", || Box::new(Success));
///
/// assert!(table.responder_exists(&ResponseTarget::new("news", "view", "success")));
/// assert!(!table.responder_exists(&ResponseTarget::new("news", "view", "error")));
/// ```
#[derive(Default)]
pub struct ResponderTable {
    factories: HashMap<ResponseTarget, ResponderFactory>,
}

impl ResponderTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a responder factory for a target, replacing any previous one.
    pub fn register<F>(
        &mut self,
        unit: impl Into<String>,
        action: impl Into<String>,
        response: impl Into<String>,
        factory: F,
    ) where
        F: Fn() -> Box<dyn Responder> + Send + Sync + 'static,
    {
        self.factories.insert(
            ResponseTarget::new(unit, action, response),
            Box::new(factory),
        );
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no target is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ResponderRegistry for ResponderTable {
    fn responder_exists(&self, target: &ResponseTarget) -> bool {
        self.factories.contains_key(target)
    }

    fn responder(&self, target: &ResponseTarget) -> Option<Box<dyn Responder>> {
        self.factories.get(target).map(|factory| factory())
    }
}

impl fmt::Debug for ResponderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut targets: Vec<_> = self.factories.keys().map(ToString::to_string).collect();
        targets.sort();
        f.debug_struct("ResponderTable")
            .field("targets", &targets)
            .finish()
    }
}
