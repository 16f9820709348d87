use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::controller::ControllerError;
use crate::datastore::{DataStoreError, TodoDataStore};
use crate::model::{Todo, TodoId, TodoPatch};

#[derive(Debug)]
pub enum StorageServiceRequest {
    List,
    Add(Todo),
    Update(TodoId, TodoPatch),
    Delete(TodoId),
}

#[derive(Debug)]
pub enum StorageServiceResponse {
    List(Vec<Todo>),
    Todo(Todo),
    Deleted(usize),
    Error(DataStoreError),
}

impl TryFrom<StorageServiceResponse> for Todo {
    type Error = ControllerError;

    fn try_from(value: StorageServiceResponse) -> Result<Self, Self::Error> {
        match value {
            StorageServiceResponse::Todo(todo) => Ok(todo),
            StorageServiceResponse::Error(err) => Err(ControllerError::DataStore(err)),
            _ => Err(ControllerError::StorageServiceError(
                "Wrong response".into(),
            )),
        }
    }
}

impl TryFrom<StorageServiceResponse> for Vec<Todo> {
    type Error = ControllerError;

    fn try_from(value: StorageServiceResponse) -> Result<Self, Self::Error> {
        match value {
            StorageServiceResponse::List(todos) => Ok(todos),
            StorageServiceResponse::Error(err) => Err(ControllerError::DataStore(err)),
            _ => Err(ControllerError::StorageServiceError(
                "Wrong response".into(),
            )),
        }
    }
}

impl TryFrom<StorageServiceResponse> for usize {
    type Error = ControllerError;

    fn try_from(value: StorageServiceResponse) -> Result<Self, Self::Error> {
        match value {
            StorageServiceResponse::Deleted(removed) => Ok(removed),
            StorageServiceResponse::Error(err) => Err(ControllerError::DataStore(err)),
            _ => Err(ControllerError::StorageServiceError(
                "Wrong response".into(),
            )),
        }
    }
}

pub type RequestResponse = (
    StorageServiceRequest,
    oneshot::Sender<StorageServiceResponse>,
);

/// Single owner of the todo list.
///
/// Requests are served one at a time in arrival order, so mutations never
/// interleave with each other or with a listing.
pub struct StorageService<D: TodoDataStore> {
    storage: D,
    rx: Receiver<RequestResponse>,
}

impl<D: TodoDataStore> StorageService<D> {
    pub fn new(storage: D, rx: Receiver<RequestResponse>) -> Self {
        Self { storage, rx }
    }

    pub fn build_runtime(self) -> std::io::Result<Runtime> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("storage")
            .enable_all()
            .build()?;

        runtime.spawn(self.start());
        Ok(runtime)
    }

    pub async fn start(mut self) {
        info!("Starting storage loop...");
        while let Some((request, response_sender)) = self.rx.recv().await {
            let response = handle_request(&mut self.storage, request);
            if response_sender.send(response).is_err() {
                warn!("storage response receiver dropped");
            }
        }
        info!("Finishing storage loop...");
    }
}

fn handle_request<D: TodoDataStore>(
    storage: &mut D,
    request: StorageServiceRequest,
) -> StorageServiceResponse {
    match request {
        StorageServiceRequest::List => StorageServiceResponse::List(storage.items()),
        StorageServiceRequest::Add(todo) => StorageServiceResponse::Todo(storage.add(todo)),
        StorageServiceRequest::Update(id, patch) => match storage.update(id, patch) {
            Ok(todo) => StorageServiceResponse::Todo(todo),
            Err(err) => StorageServiceResponse::Error(err),
        },
        StorageServiceRequest::Delete(id) => StorageServiceResponse::Deleted(storage.delete(id)),
    }
}

pub async fn send<T>(
    tx_storage: Sender<RequestResponse>,
    request: StorageServiceRequest,
) -> Result<T, ControllerError>
where
    T: TryFrom<StorageServiceResponse, Error = ControllerError>,
{
    let (req_sender, callback) = oneshot::channel();
    tx_storage
        .send((request, req_sender))
        .await
        .map_err(|err| ControllerError::StorageServiceError(err.to_string()))?;

    let res = callback
        .await
        .map_err(|err| ControllerError::StorageServiceError(err.to_string()))?;
    T::try_from(res)
}
