//! Request adapter for mapping HTTP requests to dispatch input.

use crate::method::HttpMethod;
use crate::request::ParamValue;
use crate::user::User;

use super::InputSource;

/// Framework-agnostic holder of raw request input.
///
/// `RequestAdapter` keeps simple owned data so that any front end can fill
/// it without coupling the pipeline to a specific framework's request type.
/// Repeated keys in the same list overwrite earlier ones; use
/// [`ParamValue::List`] for multi-valued fields.
///
/// # Examples
///
/// ```
/// use dispatch_core::web::RequestAdapter;
/// use dispatch_core::{HttpMethod, Request};
///
/// let mut adapter = RequestAdapter::new("req-12345").with_method(HttpMethod::Post);
/// adapter.add_query_param("id", "42");
/// adapter.add_body_param("title", "  Release notes ");
/// adapter.add_body_param("tags", vec!["rust", "web"]);
///
/// let request = Request::from_source(&adapter);
/// assert_eq!(request.request_id(), "req-12345");
/// assert_eq!(request.parameters().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    request_id: String,
    method: Option<HttpMethod>,
    user: Option<User>,
    query_params: Vec<(String, ParamValue)>,
    body_params: Vec<(String, ParamValue)>,
}

impl RequestAdapter {
    /// Creates an adapter with the given request ID and no input.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            method: None,
            user: None,
            query_params: Vec::new(),
            body_params: Vec::new(),
        }
    }

    /// Sets the request method.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the user resolved by the session layer.
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Adds a query-string parameter.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        upsert(&mut self.query_params, key.into(), value.into());
    }

    /// Adds a body parameter.
    pub fn add_body_param(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        upsert(&mut self.body_params, key.into(), value.into());
    }
}

fn upsert(params: &mut Vec<(String, ParamValue)>, key: String, value: ParamValue) {
    match params.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => params.push((key, value)),
    }
}

impl InputSource for RequestAdapter {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    fn query_parameters(&self) -> Vec<(String, ParamValue)> {
        self.query_params.clone()
    }

    fn body_parameters(&self) -> Vec<(String, ParamValue)> {
        self.body_params.clone()
    }

    fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_adapter_new() {
        let adapter = RequestAdapter::new("req-test");
        assert_eq!(adapter.request_id(), "req-test");
        assert!(adapter.method().is_none());
        assert!(adapter.user().is_none());
    }

    #[test]
    fn request_adapter_set_user() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.set_user(Some(User::authenticated()));

        assert!(adapter.user().is_some_and(User::is_authenticated));
    }

    #[test]
    fn repeated_key_overwrites_in_place() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.add_query_param("a", "1");
        adapter.add_query_param("b", "2");
        adapter.add_query_param("a", "3");

        let params = adapter.query_parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], ("a".to_string(), ParamValue::from("3")));
    }

    #[test]
    fn query_and_body_are_kept_apart() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.add_query_param("q", "search");
        adapter.add_body_param("title", "text");

        assert_eq!(adapter.query_parameters().len(), 1);
        assert_eq!(adapter.body_parameters().len(), 1);
    }

    #[test]
    fn multiple_extractions_produce_independent_copies() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.add_query_param("k", "v");

        let first = adapter.query_parameters();
        let second = adapter.query_parameters();

        assert_eq!(first, second);
    }
}
