//! Data models shared by the HTTP API and the admin panel.

pub mod api;
pub mod audit;
pub mod passwords;
pub mod typebot;

pub use api::*;
pub use audit::*;
pub use passwords::*;
pub use typebot::*;
