//! The action contract and the response descriptor it returns.

use crate::chain::ValidationChain;
use crate::error::ConfigError;
use crate::method::RequestMethods;
use crate::request::Request;
use crate::responder::ResponseTarget;
use crate::user::Privilege;

/// The unit and action name a request was routed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionRoute {
    /// Unit (namespace) of the action
    pub unit: String,
    /// Action name within the unit
    pub action: String,
}

impl ActionRoute {
    /// Creates a route.
    pub fn new(unit: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            action: action.into(),
        }
    }
}

/// Which responder an action wants to run.
///
/// # Examples
///
/// ```
/// use dispatch_core::{ActionRoute, Response, ResponseTarget};
///
/// let route = ActionRoute::new("news", "edit");
///
/// assert_eq!(
///     Response::same("input").resolve(&route),
///     Some(ResponseTarget::new("news", "edit", "input")),
/// );
/// assert_eq!(
///     Response::other("news", "view", "success").resolve(&route),
///     Some(ResponseTarget::new("news", "view", "success")),
/// );
/// assert_eq!(Response::NoResponse.resolve(&route), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Do not dispatch a responder; the action produced its output itself.
    NoResponse,
    /// A named response of the current unit and action.
    SameTarget(String),
    /// A named response of another unit and action.
    OtherTarget(ResponseTarget),
}

impl Response {
    /// Names a response of the current action.
    pub fn same(name: impl Into<String>) -> Self {
        Response::SameTarget(name.into())
    }

    /// Names a response of another action.
    pub fn other(
        unit: impl Into<String>,
        action: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Response::OtherTarget(ResponseTarget::new(unit, action, response))
    }

    /// Resolves this descriptor against the route that was invoked.
    ///
    /// Returns `None` when no responder should run. An empty response name
    /// is treated as no response.
    pub fn resolve(self, route: &ActionRoute) -> Option<ResponseTarget> {
        let target = match self {
            Response::NoResponse => return None,
            Response::SameTarget(name) => {
                ResponseTarget::new(route.unit.as_str(), route.action.as_str(), name)
            }
            Response::OtherTarget(target) => target,
        };

        if target.response.is_empty() {
            None
        } else {
            Some(target)
        }
    }
}

/// A unit of business logic run by the [`Dispatcher`](crate::Dispatcher).
///
/// Only [`handle_error`](Action::handle_error) and
/// [`execute`](Action::execute) are mandatory; the other hooks default to an
/// action that initializes, is public, serves GET and POST, registers no
/// validators and accepts every request.
pub trait Action {
    /// Prepares the action. Returning false ends the dispatch silently.
    fn initialize(&mut self, _request: &mut Request) -> bool {
        true
    }

    /// Whether the action requires authorization.
    fn is_secure(&self) -> bool {
        false
    }

    /// Privilege the user must hold when the action is secure.
    fn required_privilege(&self) -> Option<Privilege> {
        None
    }

    /// Request methods this action serves.
    fn request_methods(&self) -> RequestMethods {
        RequestMethods::GET | RequestMethods::POST
    }

    /// Response used when the request method is not served.
    fn default_response(&mut self, _request: &mut Request) -> Response {
        Response::NoResponse
    }

    /// Registers per-field validations.
    ///
    /// # Errors
    ///
    /// Propagate the `ConfigError` of an invalid validation; the dispatch
    /// then fails instead of running with the check silently missing.
    fn register_validators(&self, _chain: &mut ValidationChain<'_>) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Whole-request validation, run after the field chains pass.
    fn validate(&mut self, _request: &mut Request) -> bool {
        true
    }

    /// Called instead of `execute` when validation fails.
    fn handle_error(&mut self, request: &mut Request) -> Response;

    /// Runs the business logic.
    fn execute(&mut self, request: &mut Request) -> Response;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_target_uses_route() {
        let route = ActionRoute::new("forum", "post");
        let target = Response::same("success").resolve(&route).unwrap();

        assert_eq!(target.unit, "forum");
        assert_eq!(target.action, "post");
        assert_eq!(target.response, "success");
    }

    #[test]
    fn other_target_ignores_route() {
        let route = ActionRoute::new("forum", "post");
        let target = Response::other("forum", "thread", "view")
            .resolve(&route)
            .unwrap();

        assert_eq!(target, ResponseTarget::new("forum", "thread", "view"));
    }

    #[test]
    fn empty_name_means_no_response() {
        let route = ActionRoute::new("forum", "post");

        assert_eq!(Response::same("").resolve(&route), None);
        assert_eq!(Response::other("a", "b", "").resolve(&route), None);
        assert_eq!(Response::NoResponse.resolve(&route), None);
    }
}
