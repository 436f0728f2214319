//! HTTP front end for the encoder and decoder
//!
//! Endpoints:
//! - `GET  /health`      liveness check
//! - `GET  /vocabulary`  symbol table in ascending frequency order
//! - `POST /encode`      message text to base64 WAV
//! - `POST /decode`      base64 WAV to message text

use crate::error::CliError;
use crate::wav;
use aelwave_core::{Decoder, Encoder, Vocabulary};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub struct AppState {
    pub encoder: Encoder,
    pub decoder: Decoder,
}

// ============================================================================
// Models
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub symbol: String,
    pub frequency: u32,
}

#[derive(Debug, Deserialize)]
pub struct EncodeRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EncodeResponse {
    pub request_id: Uuid,
    pub wav_base64: String,
    pub samples: usize,
    pub duration_secs: f32,
}

#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    pub wav_base64: String,
    #[serde(default)]
    pub drop_unknown: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecodeResponse {
    pub request_id: Uuid,
    pub message: String,
    pub tokens: Vec<String>,
}

/// Error body: `{"error": "..."}`
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<CliError> for ApiError {
    fn from(err: CliError) -> Self {
        let status = match err {
            CliError::Protocol(_)
            | CliError::Wav(_)
            | CliError::Base64(_)
            | CliError::UnsupportedFormat { .. } => StatusCode::BAD_REQUEST,
            CliError::Io(_) | CliError::ConfigFile { .. } | CliError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<aelwave_core::AelError> for ApiError {
    fn from(err: aelwave_core::AelError) -> Self {
        CliError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn vocabulary_handler() -> Json<Vec<VocabularyEntry>> {
    let entries = Vocabulary::canonical()
        .entries()
        .map(|(symbol, frequency)| VocabularyEntry {
            symbol: symbol.to_string(),
            frequency,
        })
        .collect();
    Json(entries)
}

async fn encode_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EncodeRequest>,
) -> Result<Json<EncodeResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let waveform = state.encoder.encode_str(&request.message)?;
    let bytes = wav::wav_bytes(&waveform)?;
    tracing::info!(
        %request_id,
        samples = waveform.len(),
        "Encoded message of {} bytes",
        request.message.len()
    );

    Ok(Json(EncodeResponse {
        request_id,
        wav_base64: STANDARD.encode(bytes),
        samples: waveform.len(),
        duration_secs: waveform.duration_secs(),
    }))
}

async fn decode_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DecodeRequest>,
) -> Result<Json<DecodeResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let bytes = STANDARD
        .decode(request.wav_base64.as_bytes())
        .map_err(CliError::from)?;

    // FFT analysis is CPU bound; keep it off the async workers
    let task = tokio::task::spawn_blocking(move || -> Result<_, CliError> {
        let rate = state.decoder.config().sample_rate;
        let waveform = wav::read_wav(Cursor::new(bytes), rate)?;
        Ok(state.decoder.decode(&waveform)?)
    });
    let mut message = task.await.map_err(CliError::from)??;

    if request.drop_unknown {
        message = message.without_unknown();
    } else if message.has_unknown() {
        tracing::warn!(%request_id, "Decoded message contains unmatched frequencies");
    }
    tracing::info!(%request_id, tokens = message.len(), "Decoded message");

    Ok(Json(DecodeResponse {
        request_id,
        message: message.to_string(),
        tokens: message.tokens().iter().map(ToString::to_string).collect(),
    }))
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/vocabulary", get(vocabulary_handler))
        .route("/encode", post(encode_handler))
        .route("/decode", post(decode_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<(), CliError> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("aelwave server listening on http://{}", addr);
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /vocabulary");
    tracing::info!("  POST /encode");
    tracing::info!("  POST /decode");

    axum::serve(listener, app).await?;
    Ok(())
}
