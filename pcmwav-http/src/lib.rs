use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::extract::DefaultBodyLimit;
use axum::{Json, Router, extract::State, routing::post};
use pcmwav::{
    EncodeOptions, OddLength, PcmWavError, decode_base64, encode_base64, pcm_to_wav, wav_data_url,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ResponseFormat {
    #[default]
    Base64,
    Wav,
    DataUrl,
}

#[derive(Deserialize)]
struct WavRequest {
    /// Base64 PCM, mono 16-bit little-endian.
    input: String,

    #[serde(default)]
    sample_rate: Option<u32>,

    #[serde(default)]
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct WavResponse {
    status: String,
    audio: String,
}

/// Largest accepted request body. 64 MiB of base64 is about 17 minutes of 24 kHz mono PCM.
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub sample_rate: u32,
    pub odd_length: OddLength,
    /// Bodies over this many bytes are refused with 413 before decoding.
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            sample_rate: pcmwav::DEFAULT_SAMPLE_RATE,
            odd_length: OddLength::default(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

pub fn create_server(config: ServerConfig) -> Router {
    Router::new()
        .route("/v1/audio/wav", post(handle_wav))
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(config)
}

pub use axum::serve;

#[derive(Debug)]
struct ConvertError(PcmWavError);

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            PcmWavError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            // Write failures say nothing useful to the caller
            status.into_response()
        } else {
            (status, self.0.to_string()).into_response()
        }
    }
}

async fn handle_wav(
    State(config): State<ServerConfig>,
    Json(WavRequest {
        input,
        sample_rate,
        response_format,
    }): Json<WavRequest>,
) -> Result<Response, ConvertError> {
    let request_id = Uuid::new_v4();
    let opts = EncodeOptions {
        sample_rate: sample_rate.unwrap_or(config.sample_rate),
        odd_length: config.odd_length,
    };

    let wav = decode_base64(&input)
        .and_then(|pcm| pcm_to_wav(&pcm, &opts))
        .map_err(|e| {
            tracing::warn!(%request_id, error = %e, "conversion failed");
            ConvertError(e)
        })?;

    tracing::info!(
        %request_id,
        sample_rate = opts.sample_rate,
        bytes = wav.len(),
        format = ?response_format,
        "converted PCM to WAV"
    );

    let response = match response_format {
        ResponseFormat::Wav => ([(header::CONTENT_TYPE, "audio/wav")], wav).into_response(),
        ResponseFormat::Base64 => Json(WavResponse {
            status: "success".to_string(),
            audio: encode_base64(&wav),
        })
        .into_response(),
        ResponseFormat::DataUrl => Json(WavResponse {
            status: "success".to_string(),
            audio: wav_data_url(&wav),
        })
        .into_response(),
    };
    Ok(response)
}
