//! Web server implementation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

use tasklist_common::{view, AddOutcome, Task, TaskId, TaskList};

use crate::config::WebConfig;
use crate::render;
use crate::session::{SessionStore, SESSION_COOKIE};

/// Web server state
#[derive(Clone)]
pub struct WebServer {
    state: Arc<WebServerState>,
}

struct WebServerState {
    sessions: RwLock<SessionStore>,
}

impl WebServerState {
    /// Run one gesture against the caller's task list.
    ///
    /// The store's write lock is held for the whole closure, so gestures are
    /// applied one at a time and each sees the result of the previous one.
    async fn with_list<R>(&self, jar: CookieJar, f: impl FnOnce(&mut TaskList) -> R) -> (CookieJar, R) {
        let requested = jar
            .get(SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok());

        let (id, out) = self.sessions.write().await.with_list(requested, f);

        let jar = if requested == Some(id) {
            jar
        } else {
            jar.add(session_cookie(id))
        };
        (jar, out)
    }
}

fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .into()
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Task {0} not found")]
    NotFound(TaskId),
}

impl From<tasklist_common::Error> for ApiError {
    fn from(e: tasklist_common::Error) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DraftForm {
    #[serde(default)]
    pub draft: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
    pub count: usize,
    pub is_empty: bool,
    pub draft: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddTaskResponse {
    pub added: bool,
    pub task: Option<Task>,
}

impl WebServer {
    /// Create a new web server
    pub fn new(config: &WebConfig) -> Self {
        Self {
            state: Arc::new(WebServerState {
                sessions: RwLock::new(SessionStore::new(config.seed.clone(), config.max_sessions)),
            }),
        }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/health", get(health_handler))
            .route("/tasks", get(list_tasks_handler).post(api_add_task_handler))
            .route("/tasks/:task_id", delete(api_delete_task_handler))
            .route("/draft", put(api_set_draft_handler))
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

        Router::new()
            .route("/", get(index_handler))
            .route("/draft", post(set_draft_handler))
            .route("/tasks", post(add_task_handler))
            .route("/tasks/:task_id/delete", post(delete_task_handler))
            .route("/health", get(health_handler))
            .nest("/api", api)
            .fallback(not_found_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the web server and run until SIGINT/SIGTERM
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Task list listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Web server stopped");
        Ok(())
    }
}

pub async fn serve(config: WebConfig) -> anyhow::Result<()> {
    let addr = config.addr().await?;
    WebServer::new(&config).serve(addr).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Received shutdown signal");
}

// ============================================================================
// Page handlers
// ============================================================================

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "tasklist-web"
    }))
}

async fn index_handler(State(state): State<Arc<WebServerState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, html) = state
        .with_list(jar, |list| render::page(&view(&list.snapshot())))
        .await;
    (jar, Html(html))
}

/// Draft keystroke gesture without a submit
async fn set_draft_handler(
    State(state): State<Arc<WebServerState>>,
    jar: CookieJar,
    Form(form): Form<DraftForm>,
) -> impl IntoResponse {
    let (jar, _) = state.with_list(jar, |list| list.set_draft(form.draft)).await;
    (jar, Redirect::to("/"))
}

/// Submit gesture: the form carries the draft as typed
async fn add_task_handler(
    State(state): State<Arc<WebServerState>>,
    jar: CookieJar,
    Form(form): Form<DraftForm>,
) -> impl IntoResponse {
    let (jar, outcome) = state
        .with_list(jar, |list| {
            list.set_draft(form.draft);
            list.submit_draft()
        })
        .await;

    if let AddOutcome::Added(id) = outcome {
        debug!(%id, "Task submitted");
    }
    (jar, Redirect::to("/"))
}

async fn delete_task_handler(
    State(state): State<Arc<WebServerState>>,
    jar: CookieJar,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TaskId = task_id.parse()?;
    let (jar, _) = state.with_list(jar, |list| list.delete_task(id)).await;
    Ok((jar, Redirect::to("/")))
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

// ============================================================================
// JSON API handlers
// ============================================================================

fn tasks_response(list: &TaskList) -> TasksResponse {
    TasksResponse {
        tasks: list.tasks().to_vec(),
        count: list.count(),
        is_empty: list.is_empty(),
        draft: list.draft().to_string(),
    }
}

async fn list_tasks_handler(State(state): State<Arc<WebServerState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, body) = state.with_list(jar, |list| tasks_response(list)).await;
    (jar, Json(body))
}

async fn api_add_task_handler(
    State(state): State<Arc<WebServerState>>,
    jar: CookieJar,
    Json(req): Json<TextRequest>,
) -> impl IntoResponse {
    let (jar, task) = state
        .with_list(jar, |list| {
            list.add_task(&req.text)
                .task_id()
                .and_then(|id| list.get(id).cloned())
        })
        .await;

    let status = if task.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let body = AddTaskResponse {
        added: task.is_some(),
        task,
    };
    (status, jar, Json(body))
}

async fn api_delete_task_handler(
    State(state): State<Arc<WebServerState>>,
    jar: CookieJar,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, (CookieJar, ApiError)> {
    let id: TaskId = match task_id.parse() {
        Ok(id) => id,
        Err(e) => return Err((jar, ApiError::from(e))),
    };
    let (jar, removed) = state.with_list(jar, |list| list.delete_task(id)).await;
    if removed {
        Ok((StatusCode::NO_CONTENT, jar))
    } else {
        // the cookie goes out with the 404 too
        Err((jar, ApiError::NotFound(id)))
    }
}

async fn api_set_draft_handler(
    State(state): State<Arc<WebServerState>>,
    jar: CookieJar,
    Json(req): Json<TextRequest>,
) -> impl IntoResponse {
    let (jar, _) = state.with_list(jar, |list| list.set_draft(req.text)).await;
    (StatusCode::NO_CONTENT, jar)
}
