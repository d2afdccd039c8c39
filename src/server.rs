//! HTTP surface.
//!
//! A single detection endpoint plus a liveness probe, behind permissive CORS
//! and request tracing.

use crate::ai::VisionService;
use crate::detection;
use crate::models::{DetectionResponse, HealthResponse};
use crate::upload::{ImageUpload, FILE_FIELD};
use crate::{Error, Result};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

pub const DETECT_PATH: &str = "/api/detect_constructions/";

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub vision: Arc<dyn VisionService>,
}

impl AppState {
    pub fn new(vision: Arc<dyn VisionService>) -> Self {
        Self { vision }
    }
}

/// Build the router with every route and layer.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(DETECT_PATH, post(detect_constructions))
        .route(
            DETECT_PATH.trim_end_matches('/'),
            post(detect_constructions),
        )
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Serve `router` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
async fn detect_constructions(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectionResponse>> {
    let mut multipart = multipart?;
    let upload = loop {
        let field = multipart.next_field().await?.ok_or(Error::MissingFile)?;
        if field.name() == Some(FILE_FIELD) {
            break ImageUpload::from_field(field).await?;
        }
    };

    info!(
        "Received {} upload ({} bytes)",
        upload.mime,
        upload.bytes.len()
    );

    let response = detection::detect(state.vision.as_ref(), &upload).await?;
    info!("Detection completed");

    Ok(Json(response))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
