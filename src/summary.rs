//! Aggregates over the todo list, used by the dashboard and the chatbot prompt.

use serde::Serialize;

use crate::model::Todo;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high_priority: usize,
    pub deadlines: Vec<String>,
}

pub fn aggregate(todos: &[Todo]) -> Summary {
    let total = todos.len();
    let completed = todos.iter().filter(|t| t.completed).count();

    Summary {
        total,
        completed,
        pending: total - completed,
        high_priority: todos.iter().filter(|t| t.is_high_priority()).count(),
        deadlines: todos
            .iter()
            .filter(|t| !t.deadline.is_empty())
            .map(|t| t.deadline.clone())
            .collect(),
    }
}

/// Plain-text rendering of the list, one line per todo after a headline.
pub fn digest(todos: &[Todo]) -> String {
    let summary = aggregate(todos);
    let mut out = format!(
        "You have {} total tasks, {} completed, and {} pending.\n\n",
        summary.total, summary.completed, summary.pending
    );
    for todo in todos {
        let status = if todo.completed { "✅" } else { "❌" };
        out.push_str(&format!(
            "- {} {} (Priority: {}, Deadline: {})\n",
            status, todo.text, todo.priority, todo.deadline
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todos() -> Vec<Todo> {
        let mut a = Todo::new(1, "Buy milk".into());
        a.priority = "High".into();
        a.deadline = "today".into();
        let mut b = Todo::new(2, "Call mom".into());
        b.completed = true;
        let mut c = Todo::new(3, "File taxes".into());
        c.priority = "High".into();
        c.deadline = "April".into();
        vec![a, b, c]
    }

    #[test]
    fn test_aggregate() {
        let summary = aggregate(&todos());

        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.high_priority, 2);
        assert_eq!(summary.deadlines, vec!["today", "April"]);
    }

    #[test]
    fn test_aggregate_invariants_hold_for_prefixes() {
        let all = todos();
        for n in 0..=all.len() {
            let summary = aggregate(&all[..n]);
            assert_eq!(summary.pending, summary.total - summary.completed);
            assert!(summary.high_priority <= summary.total);
        }
    }

    #[test]
    fn test_digest_empty() {
        assert_eq!(
            digest(&[]),
            "You have 0 total tasks, 0 completed, and 0 pending.\n\n"
        );
    }

    #[test]
    fn test_digest_lines() {
        let text = digest(&todos());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "You have 3 total tasks, 1 completed, and 2 pending."
        );
        assert_eq!(lines[2], "- ❌ Buy milk (Priority: High, Deadline: today)");
        assert_eq!(lines[3], "- ✅ Call mom (Priority: Normal, Deadline: )");
        assert_eq!(lines.len(), 5);
    }
}
