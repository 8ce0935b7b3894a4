//! Derived presentation state
//!
//! [`view`] is a pure function of a [`Snapshot`]. Nothing here is stored; it
//! is recomputed for every render.

use serde::Serialize;

use crate::task_list::Snapshot;
use crate::types::TaskId;

pub const HEADING: &str = "Todo App";
pub const PLACEHOLDER: &str = "Add a new task...";
pub const SUBMIT_LABEL: &str = "Add";
pub const DELETE_LABEL: &str = "Delete";
pub const EMPTY_MESSAGE: &str = "No tasks yet. Add one to get started!";

/// Everything a renderer needs for one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub heading: &'static str,
    pub draft: String,
    pub placeholder: &'static str,
    pub submit_label: &'static str,
    pub count: usize,
    pub count_text: String,
    pub body: Body,
}

/// The two display modes. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Body {
    Rows { rows: Vec<RowView> },
    Empty { message: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: TaskId,
    pub text: String,
    pub delete_label: &'static str,
}

impl PageView {
    pub fn is_empty(&self) -> bool {
        matches!(self.body, Body::Empty { .. })
    }

    pub fn rows(&self) -> &[RowView] {
        match &self.body {
            Body::Rows { rows } => rows,
            Body::Empty { .. } => &[],
        }
    }
}

/// Text of the count readout for `count` tasks
pub fn count_text(count: usize) -> String {
    format!("Total tasks: {}", count)
}

/// Build the page view for a snapshot
pub fn view(snapshot: &Snapshot) -> PageView {
    let body = if snapshot.is_empty() {
        Body::Empty {
            message: EMPTY_MESSAGE,
        }
    } else {
        Body::Rows {
            rows: snapshot
                .tasks
                .iter()
                .map(|t| RowView {
                    id: t.id,
                    text: t.text.clone(),
                    delete_label: DELETE_LABEL,
                })
                .collect(),
        }
    };

    PageView {
        heading: HEADING,
        draft: snapshot.draft.clone(),
        placeholder: PLACEHOLDER,
        submit_label: SUBMIT_LABEL,
        count: snapshot.count(),
        count_text: count_text(snapshot.count()),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_list::{TaskList, DEFAULT_SEED};

    #[test]
    fn test_seeded_view_has_rows() {
        let page = view(&TaskList::seeded(DEFAULT_SEED).snapshot());
        assert!(!page.is_empty());
        assert_eq!(page.count_text, "Total tasks: 3");
        assert_eq!(page.rows().len(), 3);
        assert_eq!(page.rows()[2].text, "Master JavaScript");
    }

    #[test]
    fn test_empty_view_shows_message() {
        let page = view(&TaskList::new().snapshot());
        assert!(page.is_empty());
        assert!(page.rows().is_empty());
        assert_eq!(page.count_text, "Total tasks: 0");
        assert_eq!(
            page.body,
            Body::Empty {
                message: "No tasks yet. Add one to get started!"
            }
        );
    }

    #[test]
    fn test_view_carries_draft() {
        let mut list = TaskList::new();
        list.set_draft("half typed");
        assert_eq!(view(&list.snapshot()).draft, "half typed");
    }
}
