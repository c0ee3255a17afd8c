use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error_bag::ErrorBag;
use crate::method::RequestMethods;
use crate::responder::Renderer;
use crate::user::User;
use crate::web::InputSource;

/// Attribute under which the name of the executed renderer is recorded.
pub const RENDERER_ATTRIBUTE: &str = "renderer";

/// A submitted parameter value.
///
/// Form fields such as `tags[]` arrive as lists; everything else is text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A single text value
    Text(String),
    /// A multi-valued field
    List(Vec<String>),
}

impl ParamValue {
    /// Returns the text value, if this is not a list.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            ParamValue::List(_) => None,
        }
    }

    /// Returns the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::Text(_) => None,
            ParamValue::List(items) => Some(items),
        }
    }

    /// Returns true for an empty string or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Text(text) => text.is_empty(),
            ParamValue::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Data for one application request.
///
/// A request holds three maps:
/// - **parameters**: user input, fixed at construction. Only the validation
///   chain may replace a present value with its normalized form.
/// - **attributes**: data produced while processing, passed from the action
///   to the responder and renderer.
/// - **errors**: messages produced by validation or by the application.
///
/// # Examples
///
/// ```
/// use dispatch_core::{ParamValue, Request};
///
/// let mut request = Request::new("req-1", [("title", ParamValue::from("Hello"))]);
/// request.set_attribute("count", 3);
/// request.set_error("title", "Value is too short");
///
/// assert_eq!(request.parameter("title").and_then(ParamValue::as_text), Some("Hello"));
/// assert_eq!(request.attribute("count"), Some(&serde_json::json!(3)));
/// assert!(request.has_errors());
/// ```
pub struct Request {
    request_id: String,
    parameters: IndexMap<String, ParamValue>,
    attributes: HashMap<String, Value>,
    errors: ErrorBag,
    method: RequestMethods,
    user: Option<User>,
    renderer: Option<Box<dyn Renderer>>,
}

impl Request {
    /// Creates a request from explicit parameters.
    ///
    /// The method is left unresolved (`RequestMethods::NONE`) until set with
    /// [`Request::set_method`].
    pub fn new<I, K>(request_id: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, ParamValue)>,
        K: Into<String>,
    {
        Self {
            request_id: request_id.into(),
            parameters: parameters.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            attributes: HashMap::new(),
            errors: ErrorBag::new(),
            method: RequestMethods::NONE,
            user: None,
            renderer: None,
        }
    }

    /// Creates a request from an input source.
    ///
    /// Query parameters are always included. Body parameters are merged over
    /// them only when the method carries a body (POST, PUT, PATCH).
    pub fn from_source(source: &impl InputSource) -> Self {
        let method = source.method();
        let mut parameters: IndexMap<String, ParamValue> =
            source.query_parameters().into_iter().collect();

        if method.is_some_and(|m| m.has_body()) {
            parameters.extend(source.body_parameters());
        }

        Self {
            request_id: source.request_id().to_string(),
            parameters,
            attributes: HashMap::new(),
            errors: ErrorBag::new(),
            method: method.map(RequestMethods::from).unwrap_or(RequestMethods::NONE),
            user: source.user().cloned(),
            renderer: None,
        }
    }

    /// Attaches a user to the request.
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Seeds the request with pre-existing errors.
    pub fn with_errors(mut self, errors: ErrorBag) -> Self {
        self.errors = errors;
        self
    }

    /// Returns the request identifier used for log correlation.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the request method as a mask.
    pub fn method(&self) -> RequestMethods {
        self.method
    }

    /// Overrides the request method.
    pub fn set_method(&mut self, method: impl Into<RequestMethods>) {
        self.method = method.into();
    }

    /// Returns the user on whose behalf this request runs.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Returns a mutable reference to the user.
    pub fn user_mut(&mut self) -> Option<&mut User> {
        self.user.as_mut()
    }

    /// Returns all parameters in submission order.
    pub fn parameters(&self) -> &IndexMap<String, ParamValue> {
        &self.parameters
    }

    /// Returns a submitted parameter.
    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }

    /// Returns true if the parameter was submitted.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Replaces a present parameter with its normalized form.
    pub(crate) fn normalize_parameter(&mut self, name: &str, value: ParamValue) {
        if let Some(slot) = self.parameters.get_mut(name) {
            *slot = value;
        }
    }

    /// Returns an attribute.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets an attribute, returning the previous value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Removes an attribute.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// Returns true if the attribute is set.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Returns the error bag.
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// Returns the error registered under `name`.
    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    /// Returns errors whose key starts with `name_like`, or all errors for `None`.
    pub fn errors_like(&self, name_like: Option<&str>) -> Vec<(&str, &str)> {
        self.errors.all_like(name_like)
    }

    /// Returns true if an error is registered under `name`.
    pub fn has_error(&self, name: &str) -> bool {
        self.errors.has(name)
    }

    /// Returns true if any error has been registered.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Registers an error message.
    pub fn set_error(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.errors.set(name, message);
    }

    /// Registers several error messages.
    pub fn set_errors<I, K, V>(&mut self, errors: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.errors.set_merge(errors);
    }

    /// Returns the renderer executed for this request, if any.
    pub fn renderer(&self) -> Option<&dyn Renderer> {
        self.renderer.as_deref()
    }

    /// Stores the renderer produced by the responder.
    pub(crate) fn set_renderer(&mut self, renderer: Option<Box<dyn Renderer>>) {
        match &renderer {
            Some(r) => {
                self.attributes
                    .insert(RENDERER_ATTRIBUTE.to_string(), Value::from(r.name()));
            }
            None => {
                self.attributes.remove(RENDERER_ATTRIBUTE);
            }
        }
        self.renderer = renderer;
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("request_id", &self.request_id)
            .field("method", &self.method)
            .field("parameters", &self.parameters)
            .field("attributes", &self.attributes)
            .field("errors", &self.errors)
            .field("user", &self.user)
            .field("renderer", &self.renderer.as_ref().map(|r| r.name()))
            .finish()
    }
}
