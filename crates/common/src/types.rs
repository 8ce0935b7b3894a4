//! Core types for the task list

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Opaque task identifier.
///
/// Assigned once at creation by an [`IdGenerator`] and never reused within
/// the list that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(TaskId)
            .map_err(|_| Error::InvalidTaskId(s.to_string()))
    }
}

/// Strictly monotonic id source. Two calls never yield the same id.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A stored task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Display text exactly as submitted (not trimmed)
    pub text: String,
}

/// Result of a submit gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "id", rename_all = "snake_case")]
pub enum AddOutcome {
    /// A task was appended with this id
    Added(TaskId),
    /// The draft was blank after trimming; nothing changed
    Ignored,
}

impl AddOutcome {
    pub fn task_id(self) -> Option<TaskId> {
        match self {
            AddOutcome::Added(id) => Some(id),
            AddOutcome::Ignored => None,
        }
    }

    pub fn is_added(self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}
