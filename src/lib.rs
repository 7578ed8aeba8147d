//! wrex - a fluent builder for outgoing HTTP requests
//!
//! This crate assembles JSON or multipart form bodies, optional headers and
//! basic-auth credentials onto a [`Request`], dispatches it with a timeout,
//! and decodes the response body as JSON.

pub mod auth;
pub mod error;
pub mod logging;
pub mod multipart;
pub mod request;
pub mod response;

pub use auth::BasicAuth;
pub use error::{Result, WrexError};
pub use multipart::FilePart;
pub use request::{PreparedRequest, Request};
pub use response::Response;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
