// handler/chat.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::jobdtos::{ApiResponse, SendMessageDto},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::jobmodel::JobId,
    AppState,
};

pub fn chat_handler() -> Router {
    Router::new()
        .route("/jobs/:job_id/chat", get(get_messages).post(send_message))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<JobId>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let message = app_state.chat_service
        .send_message(job_id, &auth.principal, body.content)
        .await?;

    Ok(Json(ApiResponse::success("Message sent successfully", message)))
}

pub async fn get_messages(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<JobId>,
) -> Result<impl IntoResponse, HttpError> {
    let messages = app_state.chat_service
        .get_messages_for(job_id, &auth.principal)
        .await?;

    Ok(Json(ApiResponse::success("Messages retrieved successfully", messages)))
}
