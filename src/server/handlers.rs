use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use super::SharedState;
use crate::analysis::{AnalysisResult, TextAnalysisResult};
use crate::error::{AppError, InvokeError, RequestError};
use crate::facades::{
    ArchiveEntry, ArchiveSummary, ChatReply, GroundingReport, MediaUpload, TextMode,
};
use crate::gemini::Content;
use crate::invoker::InvocationRequest;

/// Error leaving the HTTP layer as `{error, status}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<InvokeError> for ApiError {
    fn from(err: InvokeError) -> Self {
        ApiError(err.into())
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status >= 500 {
            error!(error = %self.0, status, "Request failed");
        } else {
            info!(error = %self.0, status, "Request rejected");
        }

        let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            code,
            Json(json!({ "error": self.0.user_message(), "status": status })),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Unwrap a JSON body.
///
/// A body cut off by the length limit is reported against the upload ceiling;
/// every other rejection is a validation error.
fn body<T>(
    payload: Result<Json<T>, JsonRejection>,
    max_upload_bytes: usize,
) -> Result<T, ApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RequestError::BodyTooLarge {
                limit: max_upload_bytes,
            }
        } else {
            RequestError::Validation {
                field: "body".to_string(),
                reason: rejection.body_text(),
            }
        };
        err.into()
    })
}

/// Response of `/api/analyze`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub response: String,
    pub is_safe_mode: bool,
}

/// Body of `/api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Content>,
}

/// Body of `/api/zip`.
#[derive(Debug, Deserialize)]
pub struct ZipRequest {
    pub files: Vec<ArchiveEntry>,
}

/// Base64 media body of `/api/analyze-media`, `/api/grounding` and `/api/transcribe`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRequest {
    pub name: String,
    pub mime_type: String,
    pub data: String,
    #[serde(default)]
    pub preview: Option<String>,
}

impl MediaRequest {
    fn into_upload(self) -> Result<MediaUpload, RequestError> {
        let preview = self.preview;
        MediaUpload::from_base64(self.name, self.mime_type, &self.data)
            .map(|upload| upload.with_preview(preview))
    }
}

/// Body of `/api/analyze-text`.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
    pub mode: TextMode,
}

/// `POST /api/analyze`: raw pass-through to the resilient invoker.
pub async fn analyze(
    State(state): State<SharedState>,
    payload: Result<Json<InvocationRequest>, JsonRejection>,
) -> ApiResult<AnalyzeResponse> {
    let request = body(payload, state.config.limits.max_upload_bytes)?;
    let outcome = state.invoker.invoke(request).await?;
    Ok(Json(AnalyzeResponse {
        response: outcome.text,
        is_safe_mode: outcome.safe_mode,
    }))
}

/// `POST /api/chat`
pub async fn chat(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<ChatReply> {
    let request = body(payload, state.config.limits.max_upload_bytes)?;
    let reply = state.chat.send(&request.message, request.history).await?;
    Ok(Json(reply))
}

/// `POST /api/zip`
pub async fn zip(
    State(state): State<SharedState>,
    payload: Result<Json<ZipRequest>, JsonRejection>,
) -> ApiResult<ArchiveSummary> {
    let request = body(payload, state.config.limits.max_upload_bytes)?;
    Ok(Json(state.archive.summarize(&request.files).await?))
}

/// `POST /api/analyze-media`
pub async fn analyze_media(
    State(state): State<SharedState>,
    payload: Result<Json<MediaRequest>, JsonRejection>,
) -> ApiResult<AnalysisResult> {
    let upload = body(payload, state.config.limits.max_upload_bytes)?.into_upload()?;
    Ok(Json(state.media.analyze(&upload).await?))
}

/// `POST /api/analyze-text`
pub async fn analyze_text(
    State(state): State<SharedState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<TextAnalysisResult> {
    let request = body(payload, state.config.limits.max_upload_bytes)?;
    Ok(Json(state.text.analyze(&request.text, request.mode).await?))
}

/// `POST /api/grounding`
pub async fn grounding(
    State(state): State<SharedState>,
    payload: Result<Json<MediaRequest>, JsonRejection>,
) -> ApiResult<GroundingReport> {
    let upload = body(payload, state.config.limits.max_upload_bytes)?.into_upload()?;
    Ok(Json(state.grounding.locate(&upload).await?))
}

/// `POST /api/certificate`
pub async fn certificate(
    State(state): State<SharedState>,
    payload: Result<Json<AnalysisResult>, JsonRejection>,
) -> ApiResult<Value> {
    let result = body(payload, state.config.limits.max_upload_bytes)?;
    let certificate = state.certificate.generate(&result).await?;
    Ok(Json(json!({ "certificate": certificate })))
}

/// `POST /api/transcribe`
pub async fn transcribe(
    State(state): State<SharedState>,
    payload: Result<Json<MediaRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let upload = body(payload, state.config.limits.max_upload_bytes)?.into_upload()?;
    let transcript = state.transcriber.transcribe(&upload).await?;
    Ok(Json(json!({ "transcript": transcript })))
}

/// `GET /api/health`
pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "keys": state.invoker.keys().size(),
    }))
}

/// Any other method on a POST route.
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method Not Allowed" })),
    )
}
