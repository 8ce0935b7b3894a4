//! Task List Web Surface
//!
//! Serves the single-page task list as server-rendered HTML and routes form
//! gestures back into the per-session state manager. Also exposes a small
//! JSON API and a health check used by the E2E harness.

pub mod config;
pub mod render;
pub mod server;
pub mod session;

pub use config::WebConfig;
pub use server::{serve, WebServer};
pub use session::SessionStore;
