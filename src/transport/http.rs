//! HTTP transport for the chat assistant.
//!
//! Serves a minimal chat page plus a JSON API. The UI host contract is thin
//! on purpose: create a session, post an utterance, read the transcript. The
//! server serializes interactions per request; session state lives in an
//! in-memory store for the lifetime of the process.

use crate::chat::{ChatPipeline, ChatSession};
use crate::models::ChatTurn;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};
use uuid::Uuid;

static CHAT_PAGE: &str = include_str!("../../assets/chat.html");

/// Shared state for all HTTP handlers.
///
/// Sessions are individually locked so the map lock is only held for lookup;
/// an agent call in flight on one session never stalls the others.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<ChatPipeline>,
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<ChatSession>>>>>,
}

impl AppState {
    /// Create fresh state around a pipeline.
    pub fn new(pipeline: Arc<ChatPipeline>) -> Self {
        Self {
            pipeline,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[derive(Debug, Serialize)]
struct SessionCreated {
    session_id: Uuid,
}

#[derive(Debug, Serialize)]
struct TranscriptBody {
    turns: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct ReplyBody {
    reply: ChatTurn,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_body(message: impl Into<String>) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: message.into(),
    })
}

async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = Uuid::new_v4();
    state
        .sessions
        .write()
        .await
        .insert(session_id, Arc::new(Mutex::new(ChatSession::new())));
    info!(session_id = %session_id, "Created chat session");
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

async fn get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<TranscriptBody>, (StatusCode, Json<ErrorBody>)> {
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&session_id).cloned()
    };
    match session {
        Some(session) => Ok(Json(TranscriptBody {
            turns: session.lock().await.transcript().to_vec(),
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            error_body(format!("Unknown session: {}", session_id)),
        )),
    }
}

async fn post_message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<MessageBody>,
) -> Result<Json<ReplyBody>, (StatusCode, Json<ErrorBody>)> {
    if body.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            error_body("Message must not be empty"),
        ));
    }

    // Look up under the map lock, run the step outside it. The per-session
    // mutex keeps interactions within one session serialized.
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&session_id).cloned()
    }
    .ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            error_body(format!("Unknown session: {}", session_id)),
        )
    })?;

    let mut session = session.lock().await;
    match state.pipeline.step(&mut session, &body.message).await {
        Some(reply) => Ok(Json(ReplyBody { reply })),
        None => Err((
            StatusCode::BAD_REQUEST,
            error_body("Message must not be empty"),
        )),
    }
}

/// Build the router. Exposed separately so tests can drive it directly.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(chat_page))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_transcript))
        .route("/api/sessions/{id}/messages", post(post_message))
        .with_state(state)
}

/// HTTP server wrapping the chat pipeline.
pub struct HttpServer {
    state: AppState,
    host: String,
    port: u16,
}

impl HttpServer {
    /// Create a new server.
    pub fn new(pipeline: Arc<ChatPipeline>, host: impl Into<String>, port: u16) -> Self {
        Self {
            state: AppState::new(pipeline),
            host: host.into(),
            port,
        }
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run(&self) -> Result<(), std::io::Error> {
        let bind_addr = self.bind_addr();
        let app = router(self.state.clone());

        let listener = TcpListener::bind(&bind_addr).await.inspect_err(|e| {
            error!(error = %e, addr = %bind_addr, "Failed to bind HTTP listener");
        })?;

        info!(addr = %bind_addr, "Chat assistant ready");

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
