//! Server-side rendered pages.

use axum::extract::State;
use axum::response::Html;

use super::api::{ApiError, AppState};
use crate::model::Todo;
use crate::summary::{self, Summary};

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let todos = state.todos().await?;
    Ok(Html(render_home(&todos)))
}

pub async fn about() -> Html<String> {
    Html(render_about())
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let todos = state.todos().await?;
    Ok(Html(render_dashboard(&summary::aggregate(&todos), &todos)))
}

pub fn render_home(todos: &[Todo]) -> String {
    let body = format!(
        r#"<h1>To-Do List</h1>
<form id="new-todo">
  <input name="text" placeholder="What needs doing?" required>
  <select name="priority"><option>Normal</option><option>High</option><option>Low</option></select>
  <input name="deadline" placeholder="Deadline">
  <button type="submit">Add</button>
</form>
{}
<h2>Assistant</h2>
<form id="chat">
  <input name="message" placeholder="Ask about your tasks">
  <button type="submit">Send</button>
</form>
<p id="reply"></p>
<script>
const post = (url, body) => fetch(url, {{
  method: "POST",
  headers: {{"Content-Type": "application/json"}},
  body: JSON.stringify(body),
}});
document.getElementById("new-todo").addEventListener("submit", async (e) => {{
  e.preventDefault();
  const f = new FormData(e.target);
  await post("/api/todos", {{
    id: Date.now(),
    text: f.get("text"),
    priority: f.get("priority"),
    deadline: f.get("deadline"),
  }});
  location.reload();
}});
document.getElementById("chat").addEventListener("submit", async (e) => {{
  e.preventDefault();
  const res = await post("/api/chatbot", {{message: new FormData(e.target).get("message")}});
  document.getElementById("reply").textContent = (await res.json()).reply;
}});
</script>"#,
        todo_list(todos)
    );
    layout("To-Do List", &body)
}

pub fn render_about() -> String {
    layout(
        "About",
        "<h1>About</h1>\n\
         <p>A small to-do list with an assistant that can answer questions \
         about your tasks.</p>",
    )
}

pub fn render_dashboard(summary: &Summary, todos: &[Todo]) -> String {
    let mut body = String::from("<h1>Dashboard</h1>\n<dl>\n");
    for (id, label, value) in [
        ("total", "Total", summary.total),
        ("completed", "Completed", summary.completed),
        ("pending", "Pending", summary.pending),
        ("high-priority", "High priority", summary.high_priority),
    ] {
        body.push_str(&format!(
            "<dt>{}</dt><dd id=\"{}\">{}</dd>\n",
            label, id, value
        ));
    }
    body.push_str("</dl>\n<h2>Deadlines</h2>\n<ul>\n");
    for deadline in &summary.deadlines {
        body.push_str(&format!("<li>{}</li>\n", escape(deadline)));
    }
    body.push_str("</ul>\n<h2>All tasks</h2>\n");
    body.push_str(&todo_list(todos));
    layout("Dashboard", &body)
}

fn todo_list(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "<p>Nothing to do.</p>".into();
    }
    let mut out = String::from("<ul class=\"todos\">\n");
    for todo in todos {
        out.push_str(&format!(
            "<li class=\"{}\">{} {} <small>Priority: {}, Deadline: {}</small></li>\n",
            if todo.completed { "done" } else { "open" },
            if todo.completed { "✅" } else { "❌" },
            escape(&todo.text),
            escape(&todo.priority),
            escape(&todo.deadline),
        ));
    }
    out.push_str("</ul>");
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a> | <a href=\"/dashboard\">Dashboard</a> | <a href=\"/about\">About</a></nav>\n\
         {}\n</body>\n</html>\n",
        title, body
    )
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
