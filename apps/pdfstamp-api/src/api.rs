//! API handlers for the stamping server
//!
//! `POST /stamp` takes one of two request shapes, picked by `Content-Type`:
//!
//! - `application/json`: a [`StampRequest`] naming a `file_url` to download,
//!   with optional all-pages, offset and font size settings
//! - `multipart/form-data`: an uploaded `file` part plus a `code` field,
//!   always stamped with the default formatting
//!
//! Both check the API key before touching the body.

use axum::{
    extract::{
        multipart::MultipartError, DefaultBodyLimit, FromRequest, Multipart, Request, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pdfstamp_core::{stamp_pdf_bytes, StampOptions};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;
use crate::fetch::{fetch_pdf, redacted};
use crate::models::{HealthResponse, StampRequest, STAMPED_FILENAME};
use crate::state::AppState;

/// Content types accepted for uploaded documents
const PDF_CONTENT_TYPES: [&str; 2] = ["application/pdf", "application/octet-stream"];

/// Build the full router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/stamp", post(handle_stamp))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pdfstamp-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: POST /stamp
pub async fn handle_stamp(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    state.config.authorize(request.headers())?;

    let content_type = media_type(request.headers()).unwrap_or_default();
    let stamped = match content_type.as_str() {
        "application/json" => stamp_from_url(&state, request).await?,
        "multipart/form-data" => stamp_from_upload(&state, request).await?,
        other => {
            return Err(ApiError::InvalidRequest(format!(
                "Unsupported request content type '{}': send JSON with file_url or a multipart upload",
                other
            )))
        }
    };

    Ok(pdf_response(stamped))
}

async fn stamp_from_url(state: &AppState, request: Request) -> Result<Vec<u8>, ApiError> {
    let Json(payload) = Json::<StampRequest>::from_request(request, state)
        .await
        .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
    payload.validate()?;

    info!(
        "Stamp request: url={}, all_pages={}, top_offset_px={}, fontsize={}",
        redacted(&payload.file_url),
        payload.all_pages,
        payload.top_offset_px,
        payload.fontsize
    );

    let pdf_bytes = fetch_pdf(
        &state.http,
        &payload.file_url,
        state.config.max_upload_bytes,
    )
    .await?;

    let options = payload.options();
    run_stamp(pdf_bytes, payload.code, options).await
}

async fn stamp_from_upload(state: &AppState, request: Request) -> Result<Vec<u8>, ApiError> {
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    let limit = state.config.max_upload_bytes;
    let read_error = move |e: MultipartError| upload_error(e, limit);

    let mut file: Option<Vec<u8>> = None;
    let mut code: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let accepted = field
                    .content_type()
                    .map(essence)
                    .is_some_and(|ct| PDF_CONTENT_TYPES.contains(&ct.as_str()));
                if !accepted {
                    return Err(ApiError::UnsupportedMediaType);
                }
                let bytes = field.bytes().await.map_err(read_error)?;
                file = Some(bytes.to_vec());
            }
            Some("code") => {
                let text = field.text().await.map_err(read_error)?;
                code = Some(text);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| missing_field("file"))?;
    let code = code.ok_or_else(|| missing_field("code"))?;

    info!("Upload stamp request: {} bytes", file.len());

    run_stamp(file, code, StampOptions::default()).await
}

/// Run the stamp off the async executor; parsing and re-serializing a large
/// document is CPU-bound.
async fn run_stamp(
    pdf_bytes: Vec<u8>,
    code: String,
    options: StampOptions,
) -> Result<Vec<u8>, ApiError> {
    let stamped =
        tokio::task::spawn_blocking(move || stamp_pdf_bytes(&pdf_bytes, &code, &options))
            .await
            .map_err(|e| ApiError::Internal(format!("Stamp task panicked: {}", e)))??;

    info!("Stamped document: {} bytes", stamped.len());
    Ok(stamped)
}

fn pdf_response(body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", STAMPED_FILENAME),
            ),
        ],
        body,
    )
        .into_response()
}

/// A body cut off by the upload limit reports the limit; any other
/// multipart failure is a malformed request.
fn upload_error(error: MultipartError, limit: usize) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge(limit)
    } else {
        ApiError::InvalidRequest(error.body_text())
    }
}

fn missing_field(name: &str) -> ApiError {
    ApiError::InvalidRequest(format!("Missing multipart field '{}'", name))
}

fn media_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(essence)
}

/// Media type without parameters, lowercased: `Application/PDF; x=y` -> `application/pdf`
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
