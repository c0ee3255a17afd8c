//! The request lifecycle: authorize, validate, execute, respond, render.

use std::fmt;

use crate::action::{Action, ActionRoute};
use crate::authorization::AuthorizationHandler;
use crate::cancel::CancelToken;
use crate::chain::ValidationChain;
use crate::config::{DispatchConfig, MissingAuthorizationPolicy};
use crate::error::DispatchError;
use crate::logging::RequestLog;
use crate::request::Request;
use crate::responder::{ResponderRegistry, ResponseTarget};
use crate::validator::ValidatorRegistry;

/// Stages of a dispatch, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Action initialization
    Initialize,
    /// Authorization of a secure action
    Authorize,
    /// Field and request validation
    Validate,
    /// Action execution or error handling
    Execute,
    /// Responder lookup and execution
    Respond,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Initialize => write!(f, "initialize"),
            Stage::Authorize => write!(f, "authorize"),
            Stage::Validate => write!(f, "validate"),
            Stage::Execute => write!(f, "execute"),
            Stage::Respond => write!(f, "respond"),
        }
    }
}

/// How a dispatch ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The action declined to initialize; nothing ran.
    NotInitialized,
    /// Authorization refused the request; nothing was rendered.
    Denied,
    /// The action asked for no responder.
    NoResponse,
    /// A responder ran for `target`.
    Responded {
        /// The resolved response target
        target: ResponseTarget,
        /// Whether the responder produced and ran a renderer
        rendered: bool,
    },
}

/// Runs actions through the request lifecycle.
///
/// A dispatcher holds process-wide, read-only configuration (responders,
/// authorization handler, validator kinds) and can serve any number of
/// requests, one [`dispatch`](Dispatcher::dispatch) call per request.
///
/// # Lifecycle
///
/// ```text
/// initialize ──false──▶ NotInitialized
///     │
/// secure? ──▶ authorize ──denied──▶ Denied
///     │
/// method served? ──no──▶ default_response ─┐
///     │                                     │
/// field chains + validate ──fail──▶ handle_error
///     │                                     │
///  execute ─────────────────────────────────┤
///                                           ▼
///                         resolve ──none──▶ NoResponse
///                                           │
///                 responder registered? ──no──▶ Err(MissingResponder)
///                                           │
///           initialize → execute → renderer.execute → cleanup
/// ```
pub struct Dispatcher {
    config: DispatchConfig,
    authorization: Option<Box<dyn AuthorizationHandler>>,
    responders: Box<dyn ResponderRegistry>,
    validators: ValidatorRegistry,
}

impl Dispatcher {
    /// Creates a dispatcher with default configuration and the built-in validator kinds.
    pub fn new(responders: impl ResponderRegistry + 'static) -> Self {
        Self {
            config: DispatchConfig::default(),
            authorization: None,
            responders: Box::new(responders),
            validators: ValidatorRegistry::with_builtin(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers the authorization handler for secure actions.
    pub fn with_authorization_handler(
        mut self,
        handler: impl AuthorizationHandler + 'static,
    ) -> Self {
        self.authorization = Some(Box::new(handler));
        self
    }

    /// Replaces the validator registry.
    pub fn with_validator_registry(mut self, validators: ValidatorRegistry) -> Self {
        self.validators = validators;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Runs `action` for `request`.
    ///
    /// Validation failures are routed to the action's error hook and recorded
    /// on the request. Initialization failure and authorization denial end
    /// the dispatch without a response.
    ///
    /// # Errors
    ///
    /// - `DispatchError::MissingResponder` if the resolved target has no responder
    /// - `DispatchError::Config` if the action registers an invalid validation
    /// - `DispatchError::Cancelled` if `cancel` fires before a stage starts
    pub fn dispatch(
        &self,
        route: &ActionRoute,
        action: &mut dyn Action,
        request: &mut Request,
        cancel: &CancelToken,
    ) -> Result<DispatchOutcome, DispatchError> {
        let request_id = request.request_id().to_string();
        let log = RequestLog::new(&request_id);

        checkpoint(cancel, Stage::Initialize, &log)?;
        if !action.initialize(request) {
            log.debug(format_args!(
                "{}/{} declined to initialize",
                route.unit, route.action
            ));
            return Ok(DispatchOutcome::NotInitialized);
        }

        if action.is_secure() {
            checkpoint(cancel, Stage::Authorize, &log)?;
            if !self.authorize(route, &*action, request, &log) {
                return Ok(DispatchOutcome::Denied);
            }
        }

        let method = request.method();
        let response = if !action.request_methods().contains(method) {
            log.debug(format_args!(
                "{}/{} does not serve method mask {:#07b}, using default response",
                route.unit,
                route.action,
                method.bits()
            ));
            checkpoint(cancel, Stage::Execute, &log)?;
            action.default_response(request)
        } else {
            checkpoint(cancel, Stage::Validate, &log)?;
            let mut chain = ValidationChain::new(&self.validators, &self.config);
            action.register_validators(&mut chain)?;

            let valid = chain.execute(request) && action.validate(request);

            checkpoint(cancel, Stage::Execute, &log)?;
            if valid {
                action.execute(request)
            } else {
                log.debug(format_args!(
                    "validation failed with {} error(s)",
                    request.errors().count()
                ));
                action.handle_error(request)
            }
        };

        let Some(target) = response.resolve(route) else {
            return Ok(DispatchOutcome::NoResponse);
        };

        checkpoint(cancel, Stage::Respond, &log)?;
        self.respond(target, request, &log)
    }

    fn authorize(
        &self,
        route: &ActionRoute,
        action: &dyn Action,
        request: &Request,
        log: &RequestLog<'_>,
    ) -> bool {
        match &self.authorization {
            Some(handler) => {
                let permitted = handler.authorize(action, request);
                if !permitted {
                    log.info(format_args!(
                        "access to {}/{} denied",
                        route.unit, route.action
                    ));
                }
                permitted
            }
            None => {
                log.warn(format_args!(
                    "action {}/{} requires security but no authorization handler has been registered",
                    route.unit, route.action
                ));
                self.config.on_missing_authorization_handler
                    == MissingAuthorizationPolicy::WarnAndAllow
            }
        }
    }

    fn respond(
        &self,
        target: ResponseTarget,
        request: &mut Request,
        log: &RequestLog<'_>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let responder = if self.responders.responder_exists(&target) {
            self.responders.responder(&target)
        } else {
            None
        };

        let Some(mut responder) = responder else {
            log.error(format_args!("no responder registered for {}", target));
            return Err(DispatchError::MissingResponder {
                unit: target.unit,
                action: target.action,
                response: target.response,
            });
        };

        log.debug(format_args!("responding with {}", target));

        let mut renderer = None;
        if responder.initialize(request) {
            renderer = responder.execute(request);
            if let Some(r) = renderer.as_mut() {
                r.execute(request);
            }
        } else {
            log.debug(format_args!("responder for {} declined to initialize", target));
        }
        responder.cleanup(request);

        let rendered = renderer.is_some();
        request.set_renderer(renderer);

        Ok(DispatchOutcome::Responded { target, rendered })
    }
}

/// Fails with `Cancelled` if the token fired before `stage`.
fn checkpoint(cancel: &CancelToken, stage: Stage, log: &RequestLog<'_>) -> Result<(), DispatchError> {
    let checked = cancel.check(stage);
    if checked.is_err() {
        log.info(format_args!("dispatch cancelled before {} stage", stage));
    }
    checked
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("has_authorization_handler", &self.authorization.is_some())
            .field("validators", &self.validators)
            .finish()
    }
}
