//! Integration tests for the web input boundary.
//!
//! These tests cover the flow from a front end's raw input, through
//! `RequestAdapter`, into a dispatched action.

use dispatch_core::validator::Params;
use dispatch_core::web::RequestAdapter;
use dispatch_core::{
    Action, ActionRoute, CancelToken, ConfigError, DispatchConfig, DispatchOutcome, Dispatcher,
    HttpMethod, MissingAuthorizationPolicy, ParamValue, Renderer, Request, RequestMethods,
    Responder, ResponderTable, Response, User, ValidationChain,
};
use serde_json::json;

/// Tags an article; every tag must be a lowercase slug.
struct TagArticle;

impl Action for TagArticle {
    fn request_methods(&self) -> RequestMethods {
        RequestMethods::POST | RequestMethods::PUT
    }

    fn register_validators(&self, chain: &mut ValidationChain<'_>) -> Result<(), ConfigError> {
        chain.add_validation(
            "tags",
            "regex",
            &Params::new()
                .set("pattern", "^[a-z0-9-]+$")
                .set("pattern_error", "Tags must be lowercase slugs"),
        )?;
        chain.set_required("tags", true, None);
        Ok(())
    }

    fn handle_error(&mut self, _request: &mut Request) -> Response {
        Response::same("input")
    }

    fn execute(&mut self, request: &mut Request) -> Response {
        let count = request
            .parameter("tags")
            .and_then(ParamValue::as_list)
            .map_or(0, <[String]>::len);
        request.set_attribute("tag_count", count);
        Response::NoResponse
    }
}

/// A secure action with no privilege requirement.
struct Dashboard;

impl Action for Dashboard {
    fn is_secure(&self) -> bool {
        true
    }

    fn handle_error(&mut self, _request: &mut Request) -> Response {
        Response::NoResponse
    }

    fn execute(&mut self, request: &mut Request) -> Response {
        request.set_attribute("shown", true);
        Response::NoResponse
    }
}

struct Form;

impl Responder for Form {
    fn execute(&mut self, _request: &mut Request) -> Option<Box<dyn Renderer>> {
        None
    }
}

fn dispatcher() -> Dispatcher {
    let mut table = ResponderTable::new();
    table.register("blog", "tag", "input", || Box::new(Form));
    Dispatcher::new(table)
}

#[test]
fn body_list_values_are_validated_per_element() {
    let mut adapter = RequestAdapter::new("req-web-001").with_method(HttpMethod::Post);
    adapter.add_query_param("id", "12");
    adapter.add_body_param("tags", vec!["rust", "web-dev"]);

    let mut request = Request::from_source(&adapter);
    let outcome = dispatcher()
        .dispatch(
            &ActionRoute::new("blog", "tag"),
            &mut TagArticle,
            &mut request,
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::NoResponse);
    assert_eq!(request.attribute("tag_count"), Some(&json!(2)));
}

#[test]
fn one_bad_list_element_fails_the_field() {
    let mut adapter = RequestAdapter::new("req-web-002").with_method(HttpMethod::Put);
    adapter.add_body_param("tags", vec!["rust", "Not A Slug"]);

    let mut request = Request::from_source(&adapter);
    let outcome = dispatcher()
        .dispatch(
            &ActionRoute::new("blog", "tag"),
            &mut TagArticle,
            &mut request,
            &CancelToken::new(),
        )
        .unwrap();

    assert!(matches!(outcome, DispatchOutcome::Responded { .. }));
    assert_eq!(request.error("tags"), Some("Tags must be lowercase slugs"));
    assert!(!request.has_attribute("tag_count"));
}

#[test]
fn empty_list_counts_as_missing() {
    let mut adapter = RequestAdapter::new("req-web-003").with_method(HttpMethod::Post);
    adapter.add_body_param("tags", Vec::<String>::new());

    let mut request = Request::from_source(&adapter);
    dispatcher()
        .dispatch(
            &ActionRoute::new("blog", "tag"),
            &mut TagArticle,
            &mut request,
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(request.error("tags"), Some("Required"));
}

#[test]
fn get_body_is_ignored_and_default_response_applies() {
    let mut adapter = RequestAdapter::new("req-web-004").with_method(HttpMethod::Get);
    adapter.add_body_param("tags", vec!["rust"]);

    let mut request = Request::from_source(&adapter);
    let outcome = dispatcher()
        .dispatch(
            &ActionRoute::new("blog", "tag"),
            &mut TagArticle,
            &mut request,
            &CancelToken::new(),
        )
        .unwrap();

    assert!(!request.has_parameter("tags"));
    assert_eq!(outcome, DispatchOutcome::NoResponse);
    assert!(!request.has_errors());
}

#[test]
fn configured_messages_apply_to_every_chain() {
    let config = DispatchConfig::from_json(r#"{ "required_message": "Please fill in this field" }"#)
        .expect("valid config");
    let dispatcher = dispatcher().with_config(config);

    let adapter = RequestAdapter::new("req-web-005").with_method(HttpMethod::Post);
    let mut request = Request::from_source(&adapter);
    dispatcher
        .dispatch(
            &ActionRoute::new("blog", "tag"),
            &mut TagArticle,
            &mut request,
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(request.error("tags"), Some("Please fill in this field"));
}

#[test]
fn session_user_reaches_authorization() {
    let dispatcher = Dispatcher::new(ResponderTable::new())
        .with_authorization_handler(dispatch_core::PrivilegeAuthorizationHandler);

    let mut anonymous = Request::from_source(&RequestAdapter::new("req-web-006"));
    let denied = dispatcher
        .dispatch(
            &ActionRoute::new("admin", "dashboard"),
            &mut Dashboard,
            &mut anonymous,
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(denied, DispatchOutcome::Denied);

    let mut adapter = RequestAdapter::new("req-web-007");
    adapter.set_user(Some(User::authenticated()));
    let mut signed_in = Request::from_source(&adapter);
    let allowed = dispatcher
        .dispatch(
            &ActionRoute::new("admin", "dashboard"),
            &mut Dashboard,
            &mut signed_in,
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(allowed, DispatchOutcome::NoResponse);
    assert_eq!(signed_in.attribute("shown"), Some(&json!(true)));
}

#[test]
fn deny_policy_loaded_from_config() {
    let config = DispatchConfig::from_json(r#"{ "on_missing_authorization_handler": "deny" }"#)
        .expect("valid config");
    assert_eq!(
        config.on_missing_authorization_handler,
        MissingAuthorizationPolicy::Deny
    );

    let dispatcher = Dispatcher::new(ResponderTable::new()).with_config(config);
    let mut request = Request::from_source(&RequestAdapter::new("req-web-008"));

    let outcome = dispatcher
        .dispatch(
            &ActionRoute::new("admin", "dashboard"),
            &mut Dashboard,
            &mut request,
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Denied);
    assert!(!request.has_attribute("shown"));
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn dispatch_logs_carry_request_id() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    let dispatcher = Dispatcher::new(ResponderTable::new());
    let mut request = Request::from_source(&RequestAdapter::new("req-web-009"));

    // Secure action without a handler: warns and proceeds by default.
    let outcome = tracing::subscriber::with_default(subscriber, || {
        dispatcher.dispatch(
            &ActionRoute::new("admin", "dashboard"),
            &mut Dashboard,
            &mut request,
            &CancelToken::new(),
        )
    })
    .unwrap();

    assert_eq!(outcome, DispatchOutcome::NoResponse);

    let output = String::from_utf8_lossy(&captured.0.lock().unwrap()).into_owned();
    assert!(output.contains("request_id=req-web-009"));
    assert!(output.contains("no authorization handler has been registered"));
}
