mod datastore;
mod error;

pub use datastore::MemoryTodoStore;
pub use datastore::TodoDataStore;
pub use error::DataStoreError;
