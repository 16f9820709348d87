use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use super::error::ModelError;

pub const DEFAULT_PRIORITY: &str = "Normal";
pub const HIGH_PRIORITY: &str = "High";

pub type TodoId = i64;

/// Todo is a single task on the list.
///
/// The id is assigned by the client and is not checked for uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub priority: String,
    pub deadline: String,
}

impl Todo {
    pub fn new(id: TodoId, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
            priority: DEFAULT_PRIORITY.to_string(),
            deadline: String::new(),
        }
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == HIGH_PRIORITY
    }

    /// Overwrite the fields present in the patch, keep the rest.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
    }
}

/// Create payload as it comes from the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewTodo {
    pub id: Option<TodoId>,
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
}

impl TryFrom<NewTodo> for Todo {
    type Error = ModelError;

    fn try_from(new: NewTodo) -> Result<Self, Self::Error> {
        let id = new.id.ok_or(ModelError::MissingField("id"))?;
        let text = new.text.ok_or(ModelError::MissingField("text"))?;

        let mut todo = Todo::new(id, text);
        todo.apply(TodoPatch {
            text: None,
            completed: new.completed,
            priority: new.priority,
            deadline: new.deadline,
        });
        Ok(todo)
    }
}

/// Partial update, absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
}
