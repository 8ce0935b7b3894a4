//! HTML rendering of the task list page
//!
//! Gestures are plain HTML forms: the draft input and the add button share one
//! form, so pressing Enter in the input submits it the same way a click on the
//! button does. Each row carries its own delete form.

use tasklist_common::hooks;
use tasklist_common::{Body, PageView, RowView};

const STYLE: &str = r#"
      body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; background: #f5f5f5; margin: 0; }
      .app { max-width: 480px; margin: 48px auto; background: #fff; border-radius: 8px; padding: 24px; box-shadow: 0 2px 8px rgba(0,0,0,0.08); }
      h1 { margin-top: 0; color: #333; }
      form.add { display: flex; gap: 8px; margin-bottom: 16px; }
      form.add input { flex: 1; padding: 8px; border: 1px solid #ccc; border-radius: 4px; }
      button { padding: 8px 14px; border: 0; border-radius: 4px; background: #2563eb; color: #fff; cursor: pointer; }
      button.delete { background: #dc2626; }
      ul { list-style: none; padding: 0; margin: 0; }
      li { display: flex; justify-content: space-between; align-items: center; padding: 8px 0; border-bottom: 1px solid #eee; }
      li form { margin: 0; }
      .empty { color: #888; font-style: italic; }
      .count { color: #555; margin-bottom: 0; }
"#;

/// Render a full HTML document for `page`
pub fn page(page: &PageView) -> String {
    let body = match &page.body {
        Body::Rows { rows } => row_list(rows),
        Body::Empty { message } => format!(
            r#"<p class="empty" data-testid="{id}">{message}</p>"#,
            id = hooks::EMPTY_STATE,
            message = escape(message),
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{heading}</title>
    <style>{style}</style>
  </head>
  <body>
    <div class="app" data-testid="{root}">
      <h1 data-testid="{heading_id}">{heading}</h1>
      <form class="add" method="post" action="/tasks">
        <input type="text" name="draft" value="{draft}" placeholder="{placeholder}" autocomplete="off" autofocus data-testid="{input_id}" />
        <button type="submit" data-testid="{submit_id}">{submit_label}</button>
      </form>
      {body}
      <p class="count" data-testid="{count_id}">{count_text}</p>
    </div>
  </body>
</html>
"#,
        heading = escape(page.heading),
        style = STYLE,
        root = hooks::ROOT,
        heading_id = hooks::HEADING,
        draft = escape(&page.draft),
        placeholder = escape(page.placeholder),
        input_id = hooks::DRAFT_INPUT,
        submit_id = hooks::SUBMIT,
        submit_label = escape(page.submit_label),
        body = body,
        count_id = hooks::COUNT,
        count_text = escape(&page.count_text),
    )
}

fn row_list(rows: &[RowView]) -> String {
    let items: Vec<String> = rows.iter().map(row).collect();
    format!(
        "<ul data-testid=\"{id}\">\n{items}\n      </ul>",
        id = hooks::ROW_LIST,
        items = items.join("\n"),
    )
}

fn row(row: &RowView) -> String {
    format!(
        r#"        <li data-testid="{item_id}" {id_attr}="{task_id}">
          <span data-testid="{text_id}">{text}</span>
          <form method="post" action="/tasks/{task_id}/delete">
            <button type="submit" class="delete" data-testid="{delete_id}">{label}</button>
          </form>
        </li>"#,
        item_id = hooks::ROW,
        id_attr = hooks::TASK_ID_ATTR,
        task_id = row.id,
        text_id = hooks::ROW_TEXT,
        text = escape(&row.text),
        delete_id = hooks::ROW_DELETE,
        label = escape(row.delete_label),
    )
}

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
