//! Error types for the task list

use thiserror::Error;

/// Result type alias using the task list Error
pub type Result<T> = std::result::Result<T, Error>;

/// Task list error types
///
/// Submitting a blank draft is not represented here: it is a normal,
/// silent branch of `TaskList::add_task`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid task id: {0}")]
    InvalidTaskId(String),
}
