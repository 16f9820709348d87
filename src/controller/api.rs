use std::convert::TryFrom;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use http::{Request, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::Sender;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span};

use super::pages;
use super::storage::{self, RequestResponse, StorageServiceRequest};
use super::ControllerError;
use crate::chatbot::ChatbotGateway;
use crate::datastore::DataStoreError;
use crate::model::error::ModelError;
use crate::model::{CorrelationId, NewTodo, Todo, TodoId, TodoPatch};

#[derive(Clone)]
pub struct AppState {
    pub storage: Sender<RequestResponse>,
    pub chatbot: Arc<ChatbotGateway>,
}

impl AppState {
    pub async fn todos(&self) -> Result<Vec<Todo>, ApiError> {
        Ok(storage::send(self.storage.clone(), StorageServiceRequest::List).await?)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ModelError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ModelError::Malformed(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() })))
                    .into_response()
            }
            ApiError::Controller(ControllerError::DataStore(DataStoreError::NotFound(_))) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Todo not found" })),
            )
                .into_response(),
            ApiError::Controller(err) => {
                error!(reason = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/dashboard", get(pages::dashboard))
        .route("/health", get(health))
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/:id", put(update_todo).delete(delete_todo))
        .route("/api/chatbot", post(chatbot))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let correlation_id = CorrelationId::from_header_map_or_new(request.headers());
                info_span!(
                    "http",
                    method = %request.method(),
                    path = request.uri().path(),
                    correlation_id = %correlation_id,
                )
            }),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("SIMPLE_VERSION") }))
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.todos().await?))
}

async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<NewTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(new_todo) = payload?;
    let todo = Todo::try_from(new_todo)?;
    let todo: Todo = storage::send(state.storage, StorageServiceRequest::Add(todo)).await?;
    info!(id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(patch) = payload?;
    let todo: Todo = storage::send(state.storage, StorageServiceRequest::Update(id, patch)).await?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed: usize = storage::send(state.storage, StorageServiceRequest::Delete(id)).await?;
    info!(id, removed, "todo deleted");
    Ok(Json(json!({ "result": "Todo deleted" })))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

async fn chatbot(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChatResponse>), ApiError> {
    let Json(request) = payload?;
    let message = request.message.unwrap_or_default();
    let todos = state.todos().await?;

    match state.chatbot.reply(&message, &todos).await {
        Ok(reply) => Ok((StatusCode::OK, Json(ChatResponse { reply }))),
        Err(err) => {
            error!(reason = %err, "chatbot upstream call failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse {
                    reply: err.fallback_reply().to_string(),
                }),
            ))
        }
    }
}

/// Bind the listener up front so a taken port fails here, not in the
/// spawned server task.
pub fn build_runtime(addr: SocketAddr, state: AppState) -> anyhow::Result<Runtime> {
    let runtime = Builder::new_multi_thread()
        .thread_name("http-api")
        .enable_all()
        .build()?;

    let server = {
        let _guard = runtime.enter();
        hyper::Server::try_bind(&addr)?
    };
    info!(%addr, "Starting api...");

    runtime.spawn(async move {
        if let Err(err) = server.serve(router(state).into_make_service()).await {
            error!(reason = %err, "API server stopped.");
        }
    });
    Ok(runtime)
}
