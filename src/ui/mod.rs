//! UI adapter: the HTTP surface the landing page talks to.
//!
//! Thin axum layer over [`crate::commands`]. Handlers extract arguments,
//! call one command, and serialize the result; every failure goes through
//! the [`crate::commands::CommandError`] response mapping in [`error`].

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;

pub use router::ui_router;
pub use server::{start_ui_server_on, UiServer, UiServerError, UiServerInfo};

/// Landing page served at `/`.
pub const INDEX_HTML: &str = include_str!("../../resources/index.html");
