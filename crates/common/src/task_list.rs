//! Task list state manager
//!
//! Owns the ordered task collection and the draft. Every mutation goes
//! through [`TaskList::add_task`], [`TaskList::delete_task`] or
//! [`TaskList::set_draft`]; the presentation layer only ever sees a
//! [`Snapshot`].
//!
//! # Invariants
//! - The collection grows only by appending one task per successful add.
//! - Delete removes exactly the targeted task and keeps the order of the rest.
//! - Task ids are pairwise distinct for the lifetime of the list.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{AddOutcome, IdGenerator, Task, TaskId};

/// Tasks every new list starts with unless configured otherwise.
pub const DEFAULT_SEED: [&str; 3] = ["Learn React", "Build a todo app", "Master JavaScript"];

/// In-memory task list with its draft input
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    draft: String,
    ids: IdGenerator,
}

/// Read-only copy of the list consumed by one render pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub draft: String,
}

impl Snapshot {
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl TaskList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list pre-populated with `texts`, in order.
    ///
    /// Seeds are appended directly and are not subject to the blank-draft
    /// rule.
    pub fn seeded<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        for text in texts {
            list.append(text.into());
        }
        list
    }

    /// Append a task built from `draft_text` unless it is blank.
    ///
    /// On success the stored text is `draft_text` untouched and the draft is
    /// cleared. A blank (empty or whitespace-only) text leaves both the
    /// collection and the draft as they were.
    pub fn add_task(&mut self, draft_text: &str) -> AddOutcome {
        if draft_text.trim().is_empty() {
            debug!(len = draft_text.len(), "Ignoring blank task submission");
            return AddOutcome::Ignored;
        }

        let id = self.append(draft_text.to_string());
        self.draft.clear();
        debug!(%id, count = self.tasks.len(), "Task added");
        AddOutcome::Added(id)
    }

    /// Submit the current draft
    pub fn submit_draft(&mut self) -> AddOutcome {
        let draft = self.draft.clone();
        self.add_task(&draft)
    }

    /// Remove the task with `id`. Returns whether a task was removed.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(index) => {
                self.tasks.remove(index);
                debug!(%id, count = self.tasks.len(), "Task deleted");
                true
            }
            None => {
                debug!(%id, "Delete for unknown task ignored");
                false
            }
        }
    }

    /// Replace the draft verbatim
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.tasks.clone(),
            draft: self.draft.clone(),
        }
    }

    fn append(&mut self, text: String) -> TaskId {
        let id = self.ids.next_id();
        self.tasks.push(Task { id, text });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn texts(list: &TaskList) -> Vec<&str> {
        list.tasks().iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_seeded_list_keeps_order() {
        let list = TaskList::seeded(DEFAULT_SEED);
        assert_eq!(list.count(), 3);
        assert_eq!(texts(&list), DEFAULT_SEED.to_vec());
        assert!(list.draft().is_empty());
    }

    #[test]
    fn test_add_appends_and_clears_draft() {
        let mut list = TaskList::seeded(DEFAULT_SEED);
        list.set_draft("Test task");

        let outcome = list.submit_draft();

        assert!(outcome.is_added());
        assert_eq!(list.count(), 4);
        assert_eq!(list.tasks().last().unwrap().text, "Test task");
        assert_eq!(list.draft(), "");
    }

    #[test]
    fn test_add_stores_untrimmed_text() {
        let mut list = TaskList::new();
        list.add_task("  padded  ");
        assert_eq!(list.tasks()[0].text, "  padded  ");
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "spaces")]
    #[test_case("\t\n " ; "mixed whitespace")]
    fn test_blank_submit_is_ignored(draft: &str) {
        let mut list = TaskList::seeded(DEFAULT_SEED);
        list.set_draft(draft);

        let outcome = list.submit_draft();

        assert_eq!(outcome, AddOutcome::Ignored);
        assert_eq!(list.count(), 3);
        assert_eq!(list.draft(), draft);
    }

    #[test]
    fn test_duplicate_text_gets_distinct_ids() {
        let mut list = TaskList::new();
        let a = list.add_task("same").task_id().unwrap();
        let b = list.add_task("same").task_id().unwrap();
        assert_ne!(a, b);
        assert_eq!(list.count(), 2);
    }

    #[test]
    fn test_delete_first_preserves_order() {
        let mut list = TaskList::seeded(DEFAULT_SEED);
        let first = list.tasks()[0].id;

        assert!(list.delete_task(first));
        assert_eq!(texts(&list), vec!["Build a todo app", "Master JavaScript"]);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut list = TaskList::seeded(DEFAULT_SEED);
        let first = list.tasks()[0].id;
        list.delete_task(first);

        assert!(!list.delete_task(first));
        assert_eq!(list.count(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut list = TaskList::new();
        let a = list.add_task("a").task_id().unwrap();
        list.delete_task(a);
        let b = list.add_task("b").task_id().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_delete_all_then_add() {
        let mut list = TaskList::seeded(DEFAULT_SEED);
        while let Some(id) = list.tasks().first().map(|t| t.id) {
            list.delete_task(id);
        }
        assert!(list.is_empty());
        assert_eq!(list.count(), 0);

        list.add_task("again");
        assert!(!list.is_empty());
    }

    #[test]
    fn test_set_draft_is_verbatim() {
        let mut list = TaskList::new();
        list.set_draft("  partial ");
        assert_eq!(list.draft(), "  partial ");
        assert_eq!(list.snapshot().draft, "  partial ");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut list = TaskList::seeded(DEFAULT_SEED);
        let snap = list.snapshot();
        list.add_task("later");
        assert_eq!(snap.count(), 3);
        assert_eq!(list.count(), 4);
    }
}
