use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use fanboard_blob::BlobStore;
use fanboard_board::{
    submit_post, submit_reply, toggle_like, ImageUpload, LiveBoard, NewPost, NewReply,
};
use fanboard_render_html::{render_page, PageOptions};
use fanboard_store::DocId;

use crate::error::AppError;

const BOARD_CSS: &str = include_str!("../assets/board.css");
const BOARD_JS: &str = include_str!("../assets/board.js");

// ── Shared state ────────────────────────────────────────────────────

pub struct AppState {
    pub board: Arc<LiveBoard>,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/sse", get(sse))
        .route("/actions/submit_post", post(submit_post_action))
        .route("/actions/toggle_like", post(toggle_like_action))
        .route("/actions/submit_reply", post(submit_reply_action))
        .route("/media/:key", get(media))
        .with_state(state)
}

// ── Request types ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitPostRequest {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    pub image_name: Option<String>,
    /// Image bytes ride the JSON payload as base64.
    pub image_base64: Option<String>,
}

#[derive(Deserialize)]
pub struct ToggleLikeRequest {
    pub post_id: String,
    #[serde(default)]
    pub viewer: String,
}

#[derive(Deserialize)]
pub struct SubmitReplyRequest {
    pub post_id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
}

// ── Handlers ────────────────────────────────────────────────────────

async fn health() -> &'static str {
    "ok"
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let mut opts = PageOptions::new(state.board.current_tree(), "Fan Board");
    opts.mount_id = "board-root".into();
    opts.inline_css = Some(BOARD_CSS.into());
    opts.sse_url = Some("/sse".into());
    opts.inline_scripts.push(BOARD_JS.into());
    Html(render_page(&opts))
}

async fn sse(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Initial event carries the current full snapshot; every change after
    // that is fanned out from the board's render channel. A lagged client
    // skips intermediate states and resyncs on the next frame.
    let initial = state.board.current();
    let updates = BroadcastStream::new(state.board.subscribe()).filter_map(|msg| {
        msg.ok().map(|rendered| {
            Ok::<_, Infallible>(Event::default().event("message").data(rendered.snapshot_json))
        })
    });
    let stream = tokio_stream::once(Ok::<_, Infallible>(
        Event::default().event("message").data(initial.snapshot_json),
    ))
    .chain(updates);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn submit_post_action(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitPostRequest>,
) -> Result<Response, AppError> {
    let image = match (&req.image_name, &req.image_base64) {
        (Some(name), Some(data)) => {
            let bytes = BASE64
                .decode(data.trim())
                .map_err(|e| AppError::BadRequest(format!("image payload: {}", e)))?;
            Some(ImageUpload {
                filename: name.clone(),
                bytes,
            })
        }
        _ => None,
    };

    let doc = submit_post(
        state.board.context(),
        NewPost {
            author: req.author,
            content: req.content,
            image,
        },
    )?;
    eprintln!("[actions] post {} by {:?}", doc.id, doc.str_field("author"));
    Ok(snapshot_response(&state.board))
}

async fn toggle_like_action(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToggleLikeRequest>,
) -> Result<Response, AppError> {
    let post_id = DocId::from(req.post_id.as_str());
    let outcome = toggle_like(state.board.context(), &post_id, &req.viewer)?;
    eprintln!("[actions] like {} → {:?}", post_id, outcome);
    Ok(snapshot_response(&state.board))
}

async fn submit_reply_action(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitReplyRequest>,
) -> Result<Response, AppError> {
    let post_id = DocId::from(req.post_id.as_str());
    let doc = submit_reply(
        state.board.context(),
        &post_id,
        NewReply {
            author: req.author,
            content: req.content,
        },
    )?;
    eprintln!("[actions] reply {} on post {}", doc.id, post_id);
    Ok(snapshot_response(&state.board))
}

async fn media(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state
        .board
        .context()
        .blobs
        .get(&key)
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("no blob {}", key)))?;
    Ok((
        [(header::CONTENT_TYPE, media_content_type(&key))],
        bytes,
    )
        .into_response())
}

/// The fresh snapshot goes back in the POST response — one round trip for
/// the acting client; everyone else gets it over SSE.
fn snapshot_response(board: &LiveBoard) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        board.current().snapshot_json,
    )
        .into_response()
}

fn media_content_type(key: &str) -> &'static str {
    if key.ends_with(".png") {
        "image/png"
    } else if key.ends_with(".jpg") || key.ends_with(".jpeg") {
        "image/jpeg"
    } else if key.ends_with(".gif") {
        "image/gif"
    } else if key.ends_with(".webp") {
        "image/webp"
    } else if key.ends_with(".svg") {
        "image/svg+xml"
    } else {
        "application/octet-stream"
    }
}
