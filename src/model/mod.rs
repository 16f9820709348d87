pub mod correlation_id;
pub mod error;
pub mod todo;

pub use correlation_id::CorrelationId;
pub use todo::{NewTodo, Todo, TodoId, TodoPatch};
