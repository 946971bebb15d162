use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    error::HttpError,
    models::{
        escrowmodel::LockStatus,
        jobmodel::{Amount, JobId, JobStatus, PrincipalId},
    },
};

/// The kind tag every error carries across the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    ValidationError,
    NotFound,
    Forbidden,
    InvalidState,
    DuplicateProposal,
    AmountExceedsBudget,
    Conflict,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Job {0} not found")]
    JobNotFound(JobId),

    #[error("No live proposal from {freelancer_id} on job {job_id}")]
    ProposalNotFound { job_id: JobId, freelancer_id: PrincipalId },

    #[error("Job {0} has no escrow account")]
    EscrowNotFound(JobId),

    #[error("Job {0} has no chat thread")]
    ThreadNotFound(JobId),

    #[error("User {0} is not authorized to perform this action on job {1}")]
    UnauthorizedJobAccess(PrincipalId, JobId),

    #[error("Job {0} is {1:?}, which does not allow this action")]
    InvalidJobStatus(JobId, JobStatus),

    #[error("Invalid escrow state transition: {0}")]
    InvalidEscrowTransition(String),

    #[error("Proposal from {freelancer_id} on job {job_id} is already {status}")]
    InvalidProposalStatus { job_id: JobId, freelancer_id: PrincipalId, status: String },

    #[error("{freelancer_id} already has a live proposal on job {job_id}")]
    DuplicateProposal { job_id: JobId, freelancer_id: PrincipalId },

    #[error("Amount {amount} exceeds job budget {budget}")]
    AmountExceedsBudget { amount: Amount, budget: Amount },

    #[error("Job {job_id} changed concurrently: expected {expected:?}, found {actual:?}")]
    Conflict { job_id: JobId, expected: JobStatus, actual: JobStatus },
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::ValidationError,

            ServiceError::JobNotFound(_)
            | ServiceError::ProposalNotFound { .. }
            | ServiceError::EscrowNotFound(_)
            | ServiceError::ThreadNotFound(_) => ErrorKind::NotFound,

            ServiceError::UnauthorizedJobAccess(_, _) => ErrorKind::Forbidden,

            ServiceError::InvalidJobStatus(_, _)
            | ServiceError::InvalidEscrowTransition(_)
            | ServiceError::InvalidProposalStatus { .. } => ErrorKind::InvalidState,

            ServiceError::DuplicateProposal { .. } => ErrorKind::DuplicateProposal,
            ServiceError::AmountExceedsBudget { .. } => ErrorKind::AmountExceedsBudget,
            ServiceError::Conflict { .. } => ErrorKind::Conflict,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::InvalidState
            | ErrorKind::DuplicateProposal
            | ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::AmountExceedsBudget => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn invalid_escrow(job_id: JobId, from: LockStatus, to: LockStatus) -> Self {
        ServiceError::InvalidEscrowTransition(format!(
            "job {}: cannot transition from {:?} to {:?}",
            job_id, from, to
        ))
    }

    /// A lost compare-and-swap reads as an illegal state to callers.
    pub fn into_invalid_state(self) -> Self {
        match self {
            ServiceError::Conflict { job_id, actual, .. } => {
                ServiceError::InvalidJobStatus(job_id, actual)
            }
            other => other,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        HttpError::with_kind(error.to_string(), error.status_code(), error.kind())
    }
}
