// handler/escrow.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::jobdtos::{ApiResponse, LockFundsDto, RaiseDisputeDto},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::jobmodel::JobId,
    AppState,
};

pub fn escrow_handler() -> Router {
    Router::new()
        .route("/jobs/:job_id/escrow", get(get_escrow))
        .route("/jobs/:job_id/escrow/lock", post(lock_funds))
        .route("/jobs/:job_id/escrow/release", post(release_funds))
        .route("/jobs/:job_id/dispute", post(raise_dispute))
}

pub async fn lock_funds(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<JobId>,
    Json(body): Json<LockFundsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let escrow = app_state.escrow_service
        .lock_funds(job_id, &auth.principal, body.amount)
        .await?;

    Ok(Json(ApiResponse::success("Funds locked in escrow", escrow)))
}

pub async fn release_funds(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<JobId>,
) -> Result<impl IntoResponse, HttpError> {
    let escrow = app_state.escrow_service
        .release_funds(job_id, &auth.principal)
        .await?;

    Ok(Json(ApiResponse::success("Escrow released, job completed", escrow)))
}

pub async fn get_escrow(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<JobId>,
) -> Result<impl IntoResponse, HttpError> {
    let escrow = app_state.escrow_service.get_escrow(job_id).await?;

    Ok(Json(ApiResponse::success("Escrow retrieved successfully", escrow)))
}

// The reason is optional: a request without a JSON body raises the dispute
// with no reason, a JSON body that does not parse is refused.
pub async fn raise_dispute(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<JobId>,
    body: Result<Json<RaiseDisputeDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => RaiseDisputeDto::default(),
        Err(rejection) => return Err(HttpError::bad_request(rejection.body_text())),
    };
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let escrow = app_state.escrow_service
        .raise_dispute(job_id, &auth.principal, body.reason)
        .await?;

    Ok(Json(ApiResponse::success("Dispute raised successfully", escrow)))
}
