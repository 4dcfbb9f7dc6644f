use super::{page, SharedState};
use crate::error::ApiError;
use crate::model::{ApiInfo, DreamGeneration, DreamRequest, StatusCheck, StatusCheckCreate};
use crate::store::{SESSION_LIST_LIMIT, STATUS_LIST_LIMIT};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use tracing::debug;
use uuid::Uuid;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Turn axum's plain-text body rejections into `{"detail"}` errors.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| {
            let status = match rejection.status() {
                StatusCode::BAD_REQUEST | StatusCode::UNSUPPORTED_MEDIA_TYPE => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                other => other,
            };
            ApiError::new(status, rejection.body_text())
        })
}

/// Every page load gets a fresh session id.
pub(super) async fn form_page() -> Html<String> {
    Html(page::render_form(&Uuid::new_v4().to_string()))
}

pub(super) async fn api_root() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Dream Teller API - Transform your dreams into videos and podcasts".to_string(),
    })
}

pub(super) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(super) async fn generate_dream(
    State(state): State<SharedState>,
    payload: Result<Json<DreamRequest>, JsonRejection>,
) -> ApiResult<DreamGeneration> {
    let request = body(payload)?;
    let dream = state.generator.generate(request).await?;
    Ok(Json(dream))
}

pub(super) async fn get_dream(
    State(state): State<SharedState>,
    Path(dream_id): Path<String>,
) -> ApiResult<DreamGeneration> {
    state
        .store()
        .get_dream(&dream_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Dream generation not found"))
}

pub(super) async fn session_dreams(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> ApiResult<Vec<DreamGeneration>> {
    let dreams = state
        .store()
        .dreams_for_session(&session_id, SESSION_LIST_LIMIT)
        .await?;
    debug!(session_id = %session_id, count = dreams.len(), "Session dreams listed");
    Ok(Json(dreams))
}

pub(super) async fn create_status(
    State(state): State<SharedState>,
    payload: Result<Json<StatusCheckCreate>, JsonRejection>,
) -> ApiResult<StatusCheck> {
    let status = StatusCheck::from(body(payload)?);
    state.store().insert_status(&status).await?;
    Ok(Json(status))
}

pub(super) async fn list_status(State(state): State<SharedState>) -> ApiResult<Vec<StatusCheck>> {
    Ok(Json(state.store().list_status(STATUS_LIST_LIMIT).await?))
}
