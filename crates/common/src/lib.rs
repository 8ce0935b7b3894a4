//! Task List Common Library
//!
//! The in-memory task list state manager, its derived view model and the
//! structural hook contract shared by the web surface and the E2E suite.

pub mod error;
pub mod hooks;
pub mod task_list;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use error::{Error, Result};
pub use task_list::{Snapshot, TaskList, DEFAULT_SEED};
pub use types::*;
pub use view::{view, Body, PageView, RowView};

/// Task list version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
