// http server mode - the nevin api

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::{ChatMessage, Claude, Profile, chat_messages, commentary_prompt, moment_title_prompt};
use crate::Error;

struct AppState {
    claude: Option<Claude>,
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    history: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct CommentaryRequest {
    #[serde(default)]
    book: String,
    #[serde(default = "default_one")]
    chapter: i64,
    #[serde(default = "default_one")]
    verse: i64,
    #[serde(default, rename = "textTzotzil")]
    text_tzotzil: String,
    #[serde(default, rename = "textSpanish")]
    text_spanish: String,
}

fn default_one() -> i64 {
    1
}

#[derive(Deserialize)]
struct MomentTitleRequest {
    #[serde(default)]
    conversation: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    api_configured: bool,
}

pub struct Server;

impl Server {
    pub fn router(api_key: Option<String>) -> Router {
        if api_key.is_none() {
            tracing::warn!("no anthropic api key configured, ai endpoints will refuse requests");
        }

        let state = Arc::new(AppState {
            claude: api_key.map(Claude::new),
        });

        Router::new()
            .route("/api/health", get(health))
            .route("/api/nevin/chat", post(chat))
            .route("/api/nevin/verse-commentary", post(verse_commentary))
            .route("/api/nevin/generate-moment-title", post(moment_title))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    pub async fn run(api_key: Option<String>, host: &str, port: u16) -> Result<(), Error> {
        let app = Self::router(api_key);

        let addr = format!("{host}:{port}");
        tracing::info!("nevin api listening at http://{addr}");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "Nevin AI Backend",
        api_configured: state.claude.is_some(),
    })
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(claude) = state.claude.as_ref() else {
        return error_response(&Error::MissingApiKey);
    };

    if req.message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "No message provided" })),
        );
    }

    let messages = chat_messages(&req.message, &req.context, &req.history);

    match claude.complete(&Profile::CHAT, &messages).await {
        Ok(response) => (
            StatusCode::OK,
            Json(json!({ "success": true, "response": response })),
        ),
        Err(e) => {
            tracing::error!("error in chat endpoint: {e}");
            error_response(&e)
        }
    }
}

async fn verse_commentary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CommentaryRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(claude) = state.claude.as_ref() else {
        return error_response(&Error::MissingApiKey);
    };

    let prompt = commentary_prompt(
        &req.book,
        req.chapter,
        req.verse,
        &req.text_tzotzil,
        &req.text_spanish,
    );
    let messages = vec![ChatMessage::user(prompt)];

    match claude.complete(&Profile::COMMENTARY, &messages).await {
        Ok(commentary) => (
            StatusCode::OK,
            Json(json!({ "success": true, "commentary": commentary })),
        ),
        Err(e) => {
            tracing::error!("error in verse-commentary endpoint: {e}");
            error_response(&e)
        }
    }
}

// best effort: a failed or unparseable title falls back to a fixed one
async fn moment_title(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MomentTitleRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(claude) = state.claude.as_ref() else {
        return error_response(&Error::MissingApiKey);
    };

    if req.conversation.is_empty() {
        return fallback_title();
    }

    let messages = vec![ChatMessage::user(moment_title_prompt(&req.conversation))];

    let text = match claude.complete(&Profile::MOMENT_TITLE, &messages).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("error in generate-moment-title endpoint: {e}");
            return fallback_title();
        }
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(parsed) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "title": parsed.get("title").and_then(Value::as_str).unwrap_or("Reflexión bíblica"),
                "themes": parsed.get("themes").cloned().unwrap_or_else(|| json!([])),
                "summary": parsed.get("summary").and_then(Value::as_str).unwrap_or(""),
            })),
        ),
        Err(_) => fallback_title(),
    }
}

fn fallback_title() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "title": "Reflexión bíblica", "themes": [] })),
    )
}

// one mapping for every ai-backed endpoint; upstream detail never
// reaches the caller
fn error_response(err: &Error) -> (StatusCode, Json<Value>) {
    let (status, message) = match err {
        Error::MissingApiKey => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Servicio no configurado correctamente",
        ),
        Error::UpstreamAuth => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error de autenticación con el servicio de IA",
        ),
        Error::Upstream(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error al comunicarse con el servicio de IA",
        ),
        Error::UpstreamTimeout => (
            StatusCode::GATEWAY_TIMEOUT,
            "El servicio tardó demasiado en responder",
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error interno del servidor",
        ),
    };

    (status, Json(json!({ "success": false, "error": message })))
}
