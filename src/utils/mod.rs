//! Utility functions and helper modules.
//!
//! Request inspection, route labels and log redaction.

pub mod http;
pub mod redact;
pub mod route;

pub use http::*;
pub use redact::*;
pub use route::*;
