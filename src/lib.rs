pub mod canvas;
pub mod config;
pub mod error;
pub mod room;
pub mod storage;
pub mod websocket;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use canvas::Canvas;
use config::GameConfig;
use error::Result;
use room::RoomDirectory;
use storage::KeyValueStore;

/// Application state shared across all connections
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<RoomDirectory>,
}

impl AppState {
    pub fn new(rules: GameConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            directory: Arc::new(RoomDirectory::new(rules, storage)),
        }
    }
}

/// All HTTP and WebSocket routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(websocket::handler::ws_handler))
        .route("/ws/:room", get(websocket::handler::ws_room_handler))
        .route("/rooms/:room/canvas.png", get(canvas_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}

/// Render the room's current canvas
async fn canvas_handler(
    Path(room): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let snapshot = state.directory.lookup(&room)?.snapshot().await?;
    let canvas = Canvas::from_rows(snapshot.canvas, snapshot.width, snapshot.height)?;
    let png = canvas.to_png()?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
