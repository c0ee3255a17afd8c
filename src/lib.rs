//! Request dispatch pipeline for action-based web applications.
//!
//! A [`Dispatcher`] takes one [`Action`] and one [`Request`] through a fixed
//! lifecycle:
//! - **Initialization**: the action may decline, ending the dispatch silently
//! - **Authorization**: secure actions are checked by an [`AuthorizationHandler`]
//! - **Validation**: per-field [`ValidationChain`]s, then whole-request validation
//! - **Execution**: `execute` on success, `handle_error` on failure
//! - **Response**: the named [`Responder`] runs and may hand back a [`Renderer`]
//!
//! # Core Types
//!
//! - [`Request`]: parameters, attributes and the [`ErrorBag`] for one request
//! - [`Response`]: which responder an action wants to run
//! - [`ValidationChain`]: ordered validators per field, with a required flag
//! - [`ResponderTable`]: registry mapping response targets to responders
//! - [`CancelToken`]: cooperative cancellation checked between stages
//!
//! # Examples
//!
//! ```
//! use dispatch_core::validator::Params;
//! use dispatch_core::{
//!     Action, ActionRoute, CancelToken, ConfigError, DispatchOutcome, Dispatcher, HttpMethod,
//!     ParamValue, Renderer, Request, Responder, ResponderTable, Response, ValidationChain,
//! };
//!
//! struct PostComment;
//!
//! impl Action for PostComment {
//!     fn register_validators(&self, chain: &mut ValidationChain<'_>) -> Result<(), ConfigError> {
//!         chain.add_validation("body", "string", &Params::new().set("min", 3))?;
//!         chain.set_required("body", true, None);
//!         Ok(())
//!     }
//!
//!     fn handle_error(&mut self, _request: &mut Request) -> Response {
//!         Response::same("input")
//!     }
//!
//!     fn execute(&mut self, request: &mut Request) -> Response {
//!         request.set_attribute("saved", true);
//!         Response::same("success")
//!     }
//! }
//!
//! struct Done;
//!
//! impl Responder for Done {
//!     fn execute(&mut self, _request: &mut Request) -> Option<Box<dyn Renderer>> {
//!         None
//!     }
//! }
//!
//! let mut responders = ResponderTable::new();
//! responders.register("blog", "comment", "success", || Box::new(Done));
//! responders.register("blog", "comment", "input", || Box::new(Done));
//!
//! let dispatcher = Dispatcher::new(responders);
//! let mut request = Request::new("req-1", [("body", ParamValue::from("  Nice post  "))]);
//! request.set_method(HttpMethod::Post);
//!
//! let outcome = dispatcher
//!     .dispatch(
//!         &ActionRoute::new("blog", "comment"),
//!         &mut PostComment,
//!         &mut request,
//!         &CancelToken::new(),
//!     )
//!     .expect("responder registered");
//!
//! assert!(matches!(outcome, DispatchOutcome::Responded { .. }));
//! assert_eq!(request.parameter("body"), Some(&ParamValue::from("Nice post")));
//! assert_eq!(request.attribute("saved"), Some(&serde_json::json!(true)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod authorization;
mod cancel;
mod chain;
mod config;
mod dispatch;
mod error;
mod error_bag;
mod logging;
mod method;
mod request;
mod responder;
mod user;
pub mod validator;
pub mod web;

pub use action::{Action, ActionRoute, Response};
pub use authorization::{AuthorizationHandler, PrivilegeAuthorizationHandler};
pub use cancel::CancelToken;
pub use chain::ValidationChain;
pub use config::{DispatchConfig, MissingAuthorizationPolicy};
pub use dispatch::{DispatchOutcome, Dispatcher, Stage};
pub use error::{ConfigError, DispatchError};
pub use error_bag::ErrorBag;
pub use logging::RequestLog;
pub use method::{HttpMethod, RequestMethods, UnknownMethod};
pub use request::{ParamValue, Request, RENDERER_ATTRIBUTE};
pub use responder::{Renderer, Responder, ResponderRegistry, ResponderTable, ResponseTarget};
pub use user::{Privilege, PrivilegeMap, User, DEFAULT_NAMESPACE};
