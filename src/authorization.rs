use crate::action::Action;
use crate::request::Request;

/// Decides whether a secure action may run for a request.
///
/// Registered once on the [`Dispatcher`](crate::Dispatcher) and consulted only
/// for actions whose [`is_secure`](Action::is_secure) returns true.
pub trait AuthorizationHandler: Send + Sync {
    /// Returns true if the request may run `action`.
    fn authorize(&self, action: &dyn Action, request: &Request) -> bool;
}

/// Authorizes by the privileges of the request's user.
///
/// - no user, or an unauthenticated user: denied
/// - authenticated user, action declares no privilege: permitted
/// - authenticated user, action declares a privilege: permitted iff the user holds it
///
/// # Examples
///
/// ```
/// use dispatch_core::{
///     Action, AuthorizationHandler, ParamValue, PrivilegeAuthorizationHandler, Privilege,
///     Request, Response, User,
/// };
///
/// struct Delete;
///
/// impl Action for Delete {
///     fn is_secure(&self) -> bool {
///         true
///     }
///     fn required_privilege(&self) -> Option<Privilege> {
///         Some(Privilege::in_namespace("delete", "news"))
///     }
///     fn handle_error(&mut self, _: &mut Request) -> Response {
///         Response::NoResponse
///     }
///     fn execute(&mut self, _: &mut Request) -> Response {
///         Response::NoResponse
///     }
/// }
///
/// let mut editor = User::authenticated();
/// editor.add_privilege("delete", "news");
///
/// let handler = PrivilegeAuthorizationHandler;
/// let allowed = Request::new("req-1", Vec::<(String, ParamValue)>::new()).with_user(editor);
/// let anonymous = Request::new("req-2", Vec::<(String, ParamValue)>::new());
///
/// assert!(handler.authorize(&Delete, &allowed));
/// assert!(!handler.authorize(&Delete, &anonymous));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivilegeAuthorizationHandler;

impl AuthorizationHandler for PrivilegeAuthorizationHandler {
    fn authorize(&self, action: &dyn Action, request: &Request) -> bool {
        let Some(user) = request.user().filter(|u| u.is_authenticated()) else {
            return false;
        };

        match action.required_privilege() {
            Some(privilege) => user.holds(&privilege),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Response;
    use crate::request::ParamValue;
    use crate::user::{Privilege, User, DEFAULT_NAMESPACE};

    struct Secured(Option<Privilege>);

    impl Action for Secured {
        fn is_secure(&self) -> bool {
            true
        }

        fn required_privilege(&self) -> Option<Privilege> {
            self.0.clone()
        }

        fn handle_error(&mut self, _request: &mut Request) -> Response {
            Response::NoResponse
        }

        fn execute(&mut self, _request: &mut Request) -> Response {
            Response::NoResponse
        }
    }

    fn request_for(user: Option<User>) -> Request {
        let request = Request::new("req-auth", Vec::<(String, ParamValue)>::new());
        match user {
            Some(user) => request.with_user(user),
            None => request,
        }
    }

    #[test]
    fn anonymous_request_is_denied() {
        let handler = PrivilegeAuthorizationHandler;
        assert!(!handler.authorize(&Secured(None), &request_for(None)));
    }

    #[test]
    fn unauthenticated_user_is_denied() {
        let handler = PrivilegeAuthorizationHandler;
        let mut user = User::new();
        user.add_privilege("admin", DEFAULT_NAMESPACE);

        assert!(!handler.authorize(&Secured(None), &request_for(Some(user))));
    }

    #[test]
    fn authenticated_user_passes_without_privilege_requirement() {
        let handler = PrivilegeAuthorizationHandler;
        assert!(handler.authorize(&Secured(None), &request_for(Some(User::authenticated()))));
    }

    #[test]
    fn privilege_must_be_held_in_its_namespace() {
        let handler = PrivilegeAuthorizationHandler;
        let action = Secured(Some(Privilege::in_namespace("edit", "news")));

        let mut wrong_namespace = User::authenticated();
        wrong_namespace.add_privilege("edit", "forum");
        assert!(!handler.authorize(&action, &request_for(Some(wrong_namespace))));

        let mut editor = User::authenticated();
        editor.add_privilege("edit", "news");
        assert!(handler.authorize(&action, &request_for(Some(editor))));
    }
}
