use tracing::debug;

use super::error::DataStoreError;
use crate::model::{Todo, TodoId, TodoPatch};

pub trait TodoDataStore: Send + 'static {
    fn items(&self) -> Vec<Todo>;
    fn add(&mut self, todo: Todo) -> Todo;
    fn update(&mut self, id: TodoId, patch: TodoPatch) -> Result<Todo, DataStoreError>;
    fn delete(&mut self, id: TodoId) -> usize;
}

/// Ordered in-memory list of todos.
///
/// Ids are not indexed: every lookup is a scan in insertion order.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    todos: Vec<Todo>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self { todos: Vec::new() }
    }
}

impl TodoDataStore for MemoryTodoStore {
    fn items(&self) -> Vec<Todo> {
        self.todos.clone()
    }

    fn add(&mut self, todo: Todo) -> Todo {
        self.todos.push(todo.clone());
        debug!(id = todo.id, total = self.todos.len(), "todo added");
        todo
    }

    // only the first todo with a matching id is touched
    fn update(&mut self, id: TodoId, patch: TodoPatch) -> Result<Todo, DataStoreError> {
        let todo = self
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(DataStoreError::NotFound(id))?;
        todo.apply(patch);
        Ok(todo.clone())
    }

    // removes every todo with a matching id, returns how many were dropped
    fn delete(&mut self, id: TodoId) -> usize {
        let before = self.todos.len();
        self.todos.retain(|todo| todo.id != id);
        let removed = before - self.todos.len();
        debug!(id, removed, "todo delete");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: TodoId, text: &str) -> Todo {
        Todo::new(id, text.to_string())
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut ds = MemoryTodoStore::new();
        for (id, text) in [(3, "c"), (1, "a"), (2, "b")] {
            ds.add(todo(id, text));
        }

        let ids: Vec<TodoId> = ds.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_update_first_match_only() {
        let mut ds = MemoryTodoStore::new();
        ds.add(todo(1, "first"));
        ds.add(todo(1, "second"));

        let updated = ds
            .update(
                1,
                TodoPatch {
                    completed: Some(true),
                    ..TodoPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.text, "first");

        let items = ds.items();
        assert!(items[0].completed);
        assert!(!items[1].completed, "duplicate id is not updated");
    }

    #[test]
    fn test_update_unknown_id() {
        let mut ds = MemoryTodoStore::new();
        ds.add(todo(1, "a"));

        let err = ds
            .update(
                2,
                TodoPatch {
                    text: Some("b".into()),
                    ..TodoPatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, DataStoreError::NotFound(2));
        assert_eq!(ds.items(), vec![todo(1, "a")], "store is unchanged");
    }

    #[test]
    fn test_delete_all_matches() {
        let mut ds = MemoryTodoStore::new();
        ds.add(todo(1, "a"));
        ds.add(todo(2, "b"));
        ds.add(todo(1, "c"));

        assert_eq!(ds.delete(1), 2);
        assert_eq!(ds.items(), vec![todo(2, "b")]);

        // deleting again is a no-op
        assert_eq!(ds.delete(1), 0);
        assert_eq!(ds.items().len(), 1);
    }
}
