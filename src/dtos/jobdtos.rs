use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::jobmodel::*;

//Job Dto
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateJobDto {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 1000, message = "Description must be between 1 and 1000 characters"))]
    pub description: String,

    #[validate(range(min = 1, message = "Budget must be positive"))]
    pub budget: u64,

    pub deadline: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateJobResponseDto {
    pub job_id: JobId,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct JobListQuery {
    pub status: Option<JobStatus>,

    pub after: Option<JobId>,

    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<usize>,
}

//Proposal Dtos
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitProposalDto {
    #[validate(length(min = 1, max = 500, message = "Cover letter must be between 1 and 500 characters"))]
    pub cover_letter: String,

    #[validate(range(min = 1, message = "Proposed budget must be positive"))]
    pub proposed_budget: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitProposalResponseDto {
    pub job_id: JobId,
    pub index: usize,
}

//Escrow Dtos
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LockFundsDto {
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: u64,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct RaiseDisputeDto {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

//Chat Dtos
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SendMessageDto {
    #[validate(length(min = 1, max = 1000, message = "Message must be between 1 and 1000 characters"))]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}
