use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// HTTP method of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
}

impl HttpMethod {
    /// Returns true if this method carries form/body parameters.
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
            HttpMethod::Delete => write!(f, "DELETE"),
            HttpMethod::Patch => write!(f, "PATCH"),
        }
    }
}

/// Error returned when a method name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown request method '{}'", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Parses a method name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// Bitmask of request methods.
///
/// Actions declare the methods they serve with a mask; a request's method is
/// itself expressed as a mask so that an unresolved method (`NONE`) is
/// accepted by every action.
///
/// # Examples
///
/// ```
/// use dispatch_core::{HttpMethod, RequestMethods};
///
/// let accepted = RequestMethods::GET | RequestMethods::POST;
/// assert!(accepted.contains(HttpMethod::Post.into()));
/// assert!(!accepted.contains(HttpMethod::Delete.into()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RequestMethods(u8);

impl RequestMethods {
    /// No method; contained in every mask
    pub const NONE: RequestMethods = RequestMethods(0);
    /// GET requests
    pub const GET: RequestMethods = RequestMethods(1);
    /// POST requests
    pub const POST: RequestMethods = RequestMethods(1 << 1);
    /// PUT requests
    pub const PUT: RequestMethods = RequestMethods(1 << 2);
    /// DELETE requests
    pub const DELETE: RequestMethods = RequestMethods(1 << 3);
    /// PATCH requests
    pub const PATCH: RequestMethods = RequestMethods(1 << 4);
    /// Every method
    pub const ALL: RequestMethods = RequestMethods(0b1_1111);

    /// Returns true if every bit of `other` is set in `self`.
    pub fn contains(self, other: RequestMethods) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no bit is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw bit representation.
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for RequestMethods {
    type Output = RequestMethods;

    fn bitor(self, rhs: Self) -> Self::Output {
        RequestMethods(self.0 | rhs.0)
    }
}

impl From<HttpMethod> for RequestMethods {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => RequestMethods::GET,
            HttpMethod::Post => RequestMethods::POST,
            HttpMethod::Put => RequestMethods::PUT,
            HttpMethod::Delete => RequestMethods::DELETE,
            HttpMethod::Patch => RequestMethods::PATCH,
        }
    }
}
