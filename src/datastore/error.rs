use thiserror::*;

use crate::model::TodoId;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum DataStoreError {
    #[error("todo not found: {0}")]
    NotFound(TodoId),
}
