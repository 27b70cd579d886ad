//! Request handlers for the `/api` routes
//!
//! Gateway calls touch the filesystem under a mutex, so they run on the
//! blocking pool.

use crate::errors::{ApiError, ApiResult};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use cmdgate_engine::GatewayStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(flatten)]
    pub status: GatewayStatus,
}

pub async fn submit_command(
    State(state): State<AppState>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let gateway = state.gateway.clone();
    let submission = tokio::task::spawn_blocking(move || {
        gateway.submit(&request.command, request.source.as_deref())
    })
    .await??;

    Ok(Json(ApiResponse {
        success: true,
        message: "Command added to queue successfully".to_string(),
        command: Some(submission.command),
    }))
}

pub async fn queue_status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let gateway = state.gateway.clone();
    let status = tokio::task::spawn_blocking(move || gateway.status()).await?;

    Ok(Json(StatusResponse {
        success: true,
        status,
    }))
}

pub async fn clear_queue(State(state): State<AppState>) -> ApiResult<Json<ApiResponse>> {
    let gateway = state.gateway.clone();
    tokio::task::spawn_blocking(move || gateway.clear()).await??;

    Ok(Json(ApiResponse {
        success: true,
        message: "Command queue cleared successfully".to_string(),
        command: None,
    }))
}
