//! Structural hooks of the rendered page.
//!
//! Each element the browser suite inspects carries one of these values in its
//! `data-testid` attribute. Renaming any of them breaks the E2E specs.

pub const ROOT: &str = "todo-app";
pub const HEADING: &str = "app-title";
pub const DRAFT_INPUT: &str = "todo-input";
pub const SUBMIT: &str = "add-button";
pub const ROW_LIST: &str = "todo-list";
pub const ROW: &str = "todo-item";
pub const ROW_TEXT: &str = "todo-text";
pub const ROW_DELETE: &str = "delete-button";
pub const COUNT: &str = "todo-count";
pub const EMPTY_STATE: &str = "empty-state";

/// Attribute carrying a row's task id
pub const TASK_ID_ATTR: &str = "data-task-id";

/// CSS selector matching the element with the given test id
pub fn selector(test_id: &str) -> String {
    format!("[data-testid=\"{}\"]", test_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_format() {
        assert_eq!(selector(ROW), r#"[data-testid="todo-item"]"#);
    }
}
