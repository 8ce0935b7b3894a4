//! Page object for the task list
//!
//! Wraps the hook contract in intention-revealing actions and expectations so
//! scenarios read as user stories instead of selector lists. Every method
//! appends [`TestStep`]s; [`TaskListPage::into_spec`] turns the collected steps
//! into a runnable [`TestSpec`].

use tasklist_common::{hooks, view, DEFAULT_SEED};

use crate::spec::{TestSpec, TestStep, Viewport, WaitState};

/// Builder for steps against the task list page
#[derive(Debug, Clone, Default)]
pub struct TaskListPage {
    steps: Vec<TestStep>,
}

fn sel(test_id: &str) -> String {
    hooks::selector(test_id)
}

fn nth(test_id: &str, index: i64) -> String {
    format!("{} >> nth={}", hooks::selector(test_id), index)
}

impl TaskListPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, step: TestStep) -> Self {
        self.steps.push(step);
        self
    }

    fn assert(self, selector: String) -> AssertBuilder {
        AssertBuilder {
            page: self,
            selector,
            visible: None,
            text: None,
            texts: None,
            value: None,
            count: None,
        }
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Open the page in a fresh browser context
    pub fn goto(self) -> Self {
        self.push(TestStep::Navigate {
            url: "/".to_string(),
            wait_for_selector: Some(sel(hooks::ROOT)),
        })
    }

    /// Type into the draft input, replacing its content
    pub fn fill_draft(self, text: &str) -> Self {
        self.push(TestStep::Fill {
            selector: sel(hooks::DRAFT_INPUT),
            value: text.to_string(),
        })
    }

    /// Click the add control
    pub fn click_add(self) -> Self {
        self.push(TestStep::Click {
            selector: sel(hooks::SUBMIT),
            timeout_ms: None,
        })
    }

    /// Press Enter while the draft input has focus
    pub fn press_enter(self) -> Self {
        self.push(TestStep::Press {
            selector: Some(sel(hooks::DRAFT_INPUT)),
            key: "Enter".to_string(),
        })
        .wait_for_root()
    }

    pub fn add_task(self, text: &str) -> Self {
        self.fill_draft(text).click_add().wait_for_root()
    }

    pub fn add_task_with_enter(self, text: &str) -> Self {
        self.fill_draft(text).press_enter()
    }

    /// Click the delete control of the row at `index` (0-based)
    pub fn delete_task(self, index: usize) -> Self {
        self.push(TestStep::Click {
            selector: nth(hooks::ROW_DELETE, index as i64),
            timeout_ms: None,
        })
        .wait_for_root()
    }

    /// Delete `n` tasks one by one from the top, checking the count shrinks
    /// after each click
    pub fn delete_all(self, n: usize) -> Self {
        (0..n).rev().fold(self, |page, remaining| {
            page.delete_task(0).expect_count(remaining)
        })
    }

    fn wait_for_root(self) -> Self {
        self.push(TestStep::Wait {
            selector: sel(hooks::ROOT),
            timeout_ms: 5000,
            state: WaitState::Visible,
        })
    }

    // ------------------------------------------------------------------
    // Expectations
    // ------------------------------------------------------------------

    pub fn expect_heading(self) -> Self {
        self.assert(sel(hooks::HEADING)).text(view::HEADING).done()
    }

    pub fn expect_input_visible(self) -> Self {
        self.assert(sel(hooks::DRAFT_INPUT)).visible(true).done()
    }

    /// Count readout and number of rendered rows both equal `n`
    pub fn expect_count(self, n: usize) -> Self {
        self.assert(sel(hooks::COUNT))
            .text(&view::count_text(n))
            .done()
            .assert(sel(hooks::ROW))
            .count(n)
            .done()
    }

    pub fn expect_task_text(self, index: usize, text: &str) -> Self {
        self.assert(nth(hooks::ROW_TEXT, index as i64)).text(text).done()
    }

    pub fn expect_last_task(self, text: &str) -> Self {
        self.assert(nth(hooks::ROW_TEXT, -1)).text(text).done()
    }

    /// Rows show exactly `texts`, in order
    pub fn expect_tasks(self, texts: &[&str]) -> Self {
        self.assert(sel(hooks::ROW_TEXT)).texts(texts).done()
    }

    pub fn expect_draft(self, text: &str) -> Self {
        self.assert(sel(hooks::DRAFT_INPUT)).value(text).done()
    }

    /// Empty-state message shown, row list gone
    pub fn expect_empty_state(self) -> Self {
        self.assert(sel(hooks::EMPTY_STATE))
            .visible(true)
            .text(view::EMPTY_MESSAGE)
            .done()
            .assert(sel(hooks::ROW_LIST))
            .count(0)
            .done()
    }

    /// Row list shown, empty-state message gone
    pub fn expect_list_visible(self) -> Self {
        self.assert(sel(hooks::ROW_LIST))
            .visible(true)
            .done()
            .assert(sel(hooks::EMPTY_STATE))
            .count(0)
            .done()
    }

    pub fn expect_seeded(self) -> Self {
        self.expect_count(DEFAULT_SEED.len()).expect_tasks(&DEFAULT_SEED)
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    pub fn into_steps(self) -> Vec<TestStep> {
        self.steps
    }

    pub fn into_spec(self, name: &str, description: &str, tags: &[&str]) -> TestSpec {
        TestSpec {
            name: name.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            viewport: Viewport { width: 1280, height: 720 },
            steps: self.steps,
        }
    }
}

/// Accumulates matchers for a single assert step
pub struct AssertBuilder {
    page: TaskListPage,
    selector: String,
    visible: Option<bool>,
    text: Option<String>,
    texts: Option<Vec<String>>,
    value: Option<String>,
    count: Option<usize>,
}

impl AssertBuilder {
    pub fn visible(mut self, v: bool) -> Self {
        self.visible = Some(v);
        self
    }

    pub fn text(mut self, t: &str) -> Self {
        self.text = Some(t.to_string());
        self
    }

    pub fn texts(mut self, ts: &[&str]) -> Self {
        self.texts = Some(ts.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn value(mut self, v: &str) -> Self {
        self.value = Some(v.to_string());
        self
    }

    pub fn count(mut self, n: usize) -> Self {
        self.count = Some(n);
        self
    }

    pub fn done(self) -> TaskListPage {
        self.page.push(TestStep::Assert {
            selector: self.selector,
            visible: self.visible,
            text: self.text,
            text_contains: None,
            texts: self.texts,
            value: self.value,
            count: self.count,
        })
    }
}

/// The task list suite written against the page object
pub fn scenarios() -> Vec<TestSpec> {
    vec![
        TaskListPage::new()
            .goto()
            .expect_heading()
            .expect_input_visible()
            .expect_seeded()
            .into_spec("pom-renders-seeded-tasks", "Seeded tasks and count are shown", &["pom", "smoke"]),
        TaskListPage::new()
            .goto()
            .add_task("Test task")
            .expect_count(4)
            .expect_last_task("Test task")
            .expect_draft("")
            .into_spec("pom-add-task", "Clicking Add appends the draft and clears the input", &["pom", "add"]),
        TaskListPage::new()
            .goto()
            .add_task_with_enter("Enter task")
            .expect_count(4)
            .expect_last_task("Enter task")
            .expect_draft("")
            .into_spec("pom-add-task-with-enter", "Pressing Enter submits like the Add button", &["pom", "add"]),
        TaskListPage::new()
            .goto()
            .add_task("   ")
            .expect_count(3)
            .into_spec("pom-whitespace-ignored", "Whitespace-only drafts are not added", &["pom", "add"]),
        TaskListPage::new()
            .goto()
            .add_task("Twice")
            .expect_count(4)
            .add_task("Twice")
            .expect_count(5)
            .expect_task_text(3, "Twice")
            .expect_task_text(4, "Twice")
            .into_spec("pom-duplicate-text", "Repeated submits each create a task", &["pom", "add"]),
        TaskListPage::new()
            .goto()
            .delete_task(0)
            .expect_count(2)
            .expect_tasks(&["Build a todo app", "Master JavaScript"])
            .into_spec("pom-delete-first", "Deleting the first task keeps the rest in order", &["pom", "delete"]),
        TaskListPage::new()
            .goto()
            .delete_all(DEFAULT_SEED.len())
            .expect_empty_state()
            .expect_count(0)
            .into_spec("pom-delete-all", "Deleting every task shows the empty state", &["pom", "delete"]),
        TaskListPage::new()
            .goto()
            .delete_all(DEFAULT_SEED.len())
            .expect_empty_state()
            .add_task("Back again")
            .expect_list_visible()
            .expect_count(1)
            .expect_tasks(&["Back again"])
            .into_spec("pom-add-from-empty", "Adding from the empty state brings the list back", &["pom", "add", "delete"]),
    ]
}
