pub mod api;
mod error;
mod pages;
pub mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::instrument;

pub use error::ControllerError;

use crate::chatbot::ChatbotGateway;
use crate::config::CHANNEL_SIZE;
use crate::datastore::TodoDataStore;

use self::api::AppState;
use self::storage::{RequestResponse, StorageService};

/// Owns the runtimes of the storage actor and the HTTP API.
pub struct TodoController {
    _storage_runtime: Runtime,
    _api_runtime: Runtime,
}

impl TodoController {
    #[instrument(skip(datastore, chatbot))]
    pub fn start<D>(
        datastore: D,
        chatbot: ChatbotGateway,
        addr: SocketAddr,
    ) -> anyhow::Result<Self>
    where
        D: TodoDataStore,
    {
        let (tx_storage, rx_storage) = mpsc::channel::<RequestResponse>(CHANNEL_SIZE);
        let storage_service = StorageService::new(datastore, rx_storage);

        let state = AppState {
            storage: tx_storage,
            chatbot: Arc::new(chatbot),
        };

        Ok(Self {
            _storage_runtime: storage_service.build_runtime()?,
            _api_runtime: api::build_runtime(addr, state)?,
        })
    }

    pub fn stop(self) {
        self._api_runtime
            .shutdown_timeout(std::time::Duration::from_millis(100));
        self._storage_runtime
            .shutdown_timeout(std::time::Duration::from_millis(10));
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;
    use crate::config::ChatbotConfig;
    use crate::datastore::MemoryTodoStore;

    #[test]
    fn test_start_on_occupied_port_fails() {
        // GIVEN
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        // WHEN
        let res = TodoController::start(
            MemoryTodoStore::new(),
            ChatbotGateway::new(&ChatbotConfig::default()),
            addr,
        );

        // THEN
        assert!(res.is_err(), "start must report the failed bind");
        drop(listener);
    }

    #[test]
    fn test_start_and_stop() {
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let controller = TodoController::start(
            MemoryTodoStore::new(),
            ChatbotGateway::new(&ChatbotConfig::default()),
            addr,
        )
        .unwrap();

        // the api is listening once start returns
        assert!(std::net::TcpStream::connect(addr).is_ok());
        controller.stop();
    }
}
