// service/query_service.rs
use std::sync::Arc;

use serde::Serialize;

use crate::{
    db::{db::DBClient, jobdb::JobExt},
    models::{
        auditmodel::JobEvent,
        escrowmodel::EscrowAccount,
        jobmodel::{Job, JobFilter, JobId, PrincipalId},
    },
    service::{audit_service::AuditService, error::ServiceError, job_service::JobService},
};

/// A job together with its escrow, read under one lock.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    pub job: Job,
    pub escrow: Option<EscrowAccount>,
    pub message_count: usize,
}

/// Read-only projections. Nothing here mutates.
#[derive(Debug, Clone)]
pub struct QueryService {
    db_client: Arc<DBClient>,
    job_service: Arc<JobService>,
    audit_service: Arc<AuditService>,
}

impl QueryService {
    pub fn new(
        db_client: Arc<DBClient>,
        job_service: Arc<JobService>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self {
            db_client,
            job_service,
            audit_service,
        }
    }

    pub async fn get_jobs(
        &self,
        filter: JobFilter,
        after: Option<JobId>,
        limit: Option<usize>,
    ) -> Vec<Job> {
        self.job_service.list_jobs_page(filter, after, limit).await
    }

    pub async fn get_jobs_by_principal(&self, principal: &PrincipalId) -> Vec<Job> {
        self.job_service
            .list_jobs(JobFilter::ByClient(principal.clone()))
            .await
    }

    pub async fn get_freelancer_jobs(&self, principal: &PrincipalId) -> Vec<Job> {
        self.job_service
            .list_jobs(JobFilter::ByFreelancer(principal.clone()))
            .await
    }

    pub async fn get_applied_jobs(&self, principal: &PrincipalId) -> Vec<Job> {
        self.job_service
            .list_jobs(JobFilter::ByApplicant(principal.clone()))
            .await
    }

    pub async fn get_job_view(&self, job_id: JobId) -> Result<JobView, ServiceError> {
        self.db_client
            .read_job(job_id, |record| JobView {
                job: record.job.clone(),
                escrow: record.escrow.clone(),
                message_count: record.chat.as_ref().map_or(0, |t| t.messages.len()),
            })
            .await
            .ok_or(ServiceError::JobNotFound(job_id))
    }

    pub async fn get_job_history(&self, job_id: JobId) -> Result<Vec<JobEvent>, ServiceError> {
        self.audit_service.job_history(job_id).await
    }
}
