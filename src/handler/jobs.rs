// handler/jobs.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::jobdtos::*,
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::jobmodel::{JobFilter, JobId, PrincipalId},
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        // Job management routes
        .route("/jobs", post(post_job).get(get_jobs))
        .route("/jobs/mine", get(get_my_jobs))
        .route("/jobs/:job_id", get(get_job_details).delete(delete_job))
        .route("/jobs/:job_id/history", get(get_job_history))

        // Proposal routes
        .route("/jobs/:job_id/proposals", post(submit_proposal))
        .route("/jobs/:job_id/proposals/:freelancer_id/accept", put(accept_proposal))
        .route("/jobs/:job_id/proposals/:freelancer_id/reject", put(reject_proposal))

        // Per-principal projections
        .route("/clients/:principal/jobs", get(get_jobs_by_principal))
        .route("/freelancers/:principal/jobs", get(get_freelancer_jobs))
        .route("/freelancers/:principal/applications", get(get_applied_jobs))
}

fn parse_principal(raw: String) -> Result<PrincipalId, HttpError> {
    PrincipalId::parse(raw).ok_or_else(|| HttpError::bad_request("Principal id must not be empty"))
}

pub async fn post_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job_id = app_state.job_service
        .create_job(auth.principal, body.title, body.description, body.budget, body.deadline)
        .await?;

    Ok(Json(ApiResponse::success(
        "Job posted successfully",
        CreateJobResponseDto { job_id },
    )))
}

pub async fn get_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let filter = match query.status {
        Some(status) => JobFilter::ByStatus(status),
        None => JobFilter::All,
    };

    let jobs = app_state.query_service
        .get_jobs(filter, query.after, query.limit)
        .await;

    Ok(Json(ApiResponse::success("Jobs retrieved successfully", jobs)))
}

pub async fn get_my_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state.query_service
        .get_jobs_by_principal(&auth.principal)
        .await;

    Ok(Json(ApiResponse::success("Jobs retrieved successfully", jobs)))
}

pub async fn get_job_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<JobId>,
) -> Result<impl IntoResponse, HttpError> {
    let view = app_state.query_service.get_job_view(job_id).await?;

    Ok(Json(ApiResponse::success("Job retrieved successfully", view)))
}

pub async fn get_job_history(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<JobId>,
) -> Result<impl IntoResponse, HttpError> {
    let history = app_state.query_service.get_job_history(job_id).await?;

    Ok(Json(ApiResponse::success("Job history retrieved successfully", history)))
}

pub async fn delete_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<JobId>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state.job_service
        .delete_job(job_id, &auth.principal)
        .await?;

    Ok(Json(ApiResponse::success("Job deleted successfully", deleted)))
}

pub async fn submit_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<JobId>,
    Json(body): Json<SubmitProposalDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let index = app_state.proposal_service
        .submit_proposal(job_id, &auth.principal, body.cover_letter, body.proposed_budget)
        .await?;

    Ok(Json(ApiResponse::success(
        "Proposal submitted successfully",
        SubmitProposalResponseDto { job_id, index },
    )))
}

pub async fn accept_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path((job_id, freelancer_id)): Path<(JobId, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let freelancer_id = parse_principal(freelancer_id)?;

    app_state.proposal_service
        .accept_proposal(job_id, &auth.principal, &freelancer_id)
        .await?;

    Ok(Json(ApiResponse::success("Proposal accepted successfully", ())))
}

pub async fn reject_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path((job_id, freelancer_id)): Path<(JobId, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let freelancer_id = parse_principal(freelancer_id)?;

    app_state.proposal_service
        .reject_proposal(job_id, &auth.principal, &freelancer_id)
        .await?;

    Ok(Json(ApiResponse::success("Proposal rejected successfully", ())))
}

pub async fn get_jobs_by_principal(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(principal): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let principal = parse_principal(principal)?;
    let jobs = app_state.query_service.get_jobs_by_principal(&principal).await;

    Ok(Json(ApiResponse::success("Jobs retrieved successfully", jobs)))
}

pub async fn get_freelancer_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(principal): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let principal = parse_principal(principal)?;
    let jobs = app_state.query_service.get_freelancer_jobs(&principal).await;

    Ok(Json(ApiResponse::success("Jobs retrieved successfully", jobs)))
}

pub async fn get_applied_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(principal): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let principal = parse_principal(principal)?;
    let jobs = app_state.query_service.get_applied_jobs(&principal).await;

    Ok(Json(ApiResponse::success("Jobs retrieved successfully", jobs)))
}
