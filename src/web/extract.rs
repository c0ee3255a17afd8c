//! Extraction boundary trait for web integration.

use crate::method::HttpMethod;
use crate::request::ParamValue;
use crate::user::User;

/// Supplies the raw input of one inbound request.
///
/// Implementations only map front-end types to parameter lists. Deciding
/// which lists apply to the request is the job of
/// [`Request::from_source`](crate::Request::from_source).
///
/// # Examples
///
/// ```
/// use dispatch_core::web::InputSource;
/// use dispatch_core::{HttpMethod, ParamValue, Request};
///
/// struct CgiRequest {
///     query: Vec<(String, String)>,
/// }
///
/// impl InputSource for CgiRequest {
///     fn request_id(&self) -> &str {
///         "cgi-1"
///     }
///
///     fn method(&self) -> Option<HttpMethod> {
///         Some(HttpMethod::Get)
///     }
///
///     fn query_parameters(&self) -> Vec<(String, ParamValue)> {
///         self.query
///             .iter()
///             .map(|(k, v)| (k.clone(), ParamValue::from(v.as_str())))
///             .collect()
///     }
///
///     fn body_parameters(&self) -> Vec<(String, ParamValue)> {
///         Vec::new()
///     }
/// }
///
/// let source = CgiRequest { query: vec![("page".to_string(), "2".to_string())] };
/// let request = Request::from_source(&source);
/// assert!(request.has_parameter("page"));
/// ```
pub trait InputSource {
    /// Identifier used to correlate log output for this request.
    fn request_id(&self) -> &str;

    /// The request method, or `None` if the front end does not know it.
    fn method(&self) -> Option<HttpMethod>;

    /// Parameters from the query string.
    fn query_parameters(&self) -> Vec<(String, ParamValue)>;

    /// Parameters from the request body.
    fn body_parameters(&self) -> Vec<(String, ParamValue)>;

    /// The user resolved by the session layer, if any.
    fn user(&self) -> Option<&User> {
        None
    }
}
