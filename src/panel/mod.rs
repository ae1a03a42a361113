//! Admin panel client.
//!
//! [`AdminPanelController`] reacts to the page events (reset form submit,
//! refresh click, vendor select change), calls the server through a
//! [`PanelApi`] and reports outcomes on an [`AlertBoard`]. The page itself is
//! abstracted behind [`FormFields`] and [`PageReloader`] so the controller
//! runs the same against the terminal page and against test doubles.

pub mod alerts;
pub mod api;
pub mod console;
pub mod controller;

pub use alerts::{Alert, AlertBoard, Severity};
pub use api::{HttpPanelApi, PanelApi, PanelError, decode_reply};
pub use console::{Command, CommandError, ConsolePage};
pub use controller::*;
