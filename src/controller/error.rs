use thiserror::Error;

use crate::datastore::DataStoreError;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    DataStore(#[from] DataStoreError),
    #[error("storage service error: {0}")]
    StorageServiceError(String),
}
