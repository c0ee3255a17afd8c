//! Input boundary between an HTTP front end and the dispatch pipeline.
//!
//! A front end (hyper, axum, a CGI shim) implements [`InputSource`] for its
//! own request type, or fills a [`RequestAdapter`], and builds a
//! [`Request`](crate::Request) with [`Request::from_source`](crate::Request::from_source).
//!
//! # Integration Flow
//!
//! ```text
//! HTTP Request
//!   ↓
//! Front end fills RequestAdapter (or implements InputSource)
//!   ↓
//! Request::from_source()  -- query always, body only for POST/PUT/PATCH
//!   ↓
//! Dispatcher::dispatch()
//! ```

mod adapter;
mod extract;

pub use adapter::RequestAdapter;
pub use extract::InputSource;
