// service/job_service.rs
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
    db::{
        db::{DBClient, JobTx},
        jobdb::JobExt,
    },
    models::jobmodel::*,
    service::{audit_service::AuditService, error::ServiceError},
};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

fn validate_job_posting(title: &str, description: &str, budget: Amount) -> Result<(), ServiceError> {
    let title_len = title.trim().chars().count();
    if title_len == 0 || title.chars().count() > MAX_TITLE_LEN {
        return Err(ServiceError::Validation(format!(
            "Job title must be between 1 and {} characters",
            MAX_TITLE_LEN
        )));
    }

    let description_len = description.trim().chars().count();
    if description_len == 0 || description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ServiceError::Validation(format!(
            "Job description must be between 1 and {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }

    if budget == 0 {
        return Err(ServiceError::Validation("Budget must be greater than 0".to_string()));
    }

    Ok(())
}

/// Owner of job records and the only place job status changes.
#[derive(Debug, Clone)]
pub struct JobService {
    db_client: Arc<DBClient>,
    audit_service: Arc<AuditService>,
}

impl JobService {
    pub fn new(db_client: Arc<DBClient>, audit_service: Arc<AuditService>) -> Self {
        Self {
            db_client,
            audit_service,
        }
    }

    pub async fn create_job(
        &self,
        client_id: PrincipalId,
        title: String,
        description: String,
        budget: Amount,
        deadline: NaiveDate,
    ) -> Result<JobId, ServiceError> {
        validate_job_posting(&title, &description, budget)?;

        let posted = self.audit_service.job_posted_event(&client_id, &title, budget);
        let job = self
            .db_client
            .insert_job(
                NewJob {
                    client_id,
                    title,
                    description,
                    budget,
                    deadline,
                },
                posted,
            )
            .await;

        tracing::info!(
            "Job {} posted by {} with budget {} (deadline {})",
            job.id,
            job.client_id,
            job.budget,
            job.deadline
        );

        Ok(job.id)
    }

    pub async fn get_job(&self, job_id: JobId) -> Result<Job, ServiceError> {
        self.db_client
            .read_job(job_id, |record| record.job.clone())
            .await
            .ok_or(ServiceError::JobNotFound(job_id))
    }

    pub async fn list_jobs(&self, filter: JobFilter) -> Vec<Job> {
        self.db_client.list_jobs(&filter, None, None).await
    }

    pub async fn list_jobs_page(
        &self,
        filter: JobFilter,
        after: Option<JobId>,
        limit: Option<usize>,
    ) -> Vec<Job> {
        self.db_client.list_jobs(&filter, after, limit).await
    }

    pub async fn delete_job(
        &self,
        job_id: JobId,
        requester_id: &PrincipalId,
    ) -> Result<bool, ServiceError> {
        let mut tx = self
            .db_client
            .begin_job_tx(job_id)
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if tx.job.client_id != *requester_id {
            return Err(ServiceError::UnauthorizedJobAccess(requester_id.clone(), job_id));
        }

        if tx.job.status != JobStatus::Open {
            return Err(ServiceError::InvalidJobStatus(job_id, tx.job.status));
        }

        self.transition_in(&mut tx, JobStatus::Open, JobStatus::Deleted, Some(requester_id))?;
        self.audit_service.log_job_deletion(&mut tx, requester_id);
        tx.commit();

        tracing::info!("Job {} deleted by {}", job_id, requester_id);
        Ok(true)
    }

    /// Compare-and-swap on a job's status along a lifecycle edge.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) async fn transition(
        &self,
        job_id: JobId,
        expected: JobStatus,
        to: JobStatus,
    ) -> Result<Job, ServiceError> {
        let mut tx = self
            .db_client
            .begin_job_tx(job_id)
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?;

        self.transition_in(&mut tx, expected, to, None)?;
        Ok(tx.commit())
    }

    /// The same guard, applied inside a transaction another service already holds.
    pub(crate) fn transition_in(
        &self,
        tx: &mut JobTx,
        expected: JobStatus,
        to: JobStatus,
        actor: Option<&PrincipalId>,
    ) -> Result<(), ServiceError> {
        let actual = tx.job.status;
        if !expected.can_transition_to(to) {
            return Err(ServiceError::InvalidJobStatus(tx.job.id, actual));
        }

        if actual != expected {
            tracing::warn!(
                "Job {} transition {:?} -> {:?} lost: status is {:?}",
                tx.job.id,
                expected,
                to,
                actual
            );
            return Err(ServiceError::Conflict {
                job_id: tx.job.id,
                expected,
                actual,
            });
        }

        tx.job.status = to;
        tx.job.updated_at = Utc::now();
        self.audit_service.log_status_change(tx, actor, expected, to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::error::ErrorKind;

    fn service() -> JobService {
        let db_client = Arc::new(DBClient::new());
        let audit_service = Arc::new(AuditService::new(db_client.clone()));
        JobService::new(db_client, audit_service)
    }

    fn principal(raw: &str) -> PrincipalId {
        PrincipalId::parse(raw).unwrap()
    }

    fn deadline() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    #[tokio::test]
    async fn create_job_assigns_monotonic_ids_and_opens() {
        let svc = service();
        let first = svc
            .create_job(principal("client-a"), "Logo".into(), "Design a logo".into(), 500, deadline())
            .await
            .unwrap();
        let second = svc
            .create_job(principal("client-a"), "Site".into(), "Build a site".into(), 900, deadline())
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);

        let job = svc.get_job(first).await.unwrap();
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.budget, 500);
        assert_eq!(job.deadline, deadline());
        assert!(job.assigned_freelancer.is_none());
        assert!(job.proposals.is_empty());
    }

    #[tokio::test]
    async fn create_job_rejects_bad_input() {
        let svc = service();
        let cases = [
            ("", "desc", 10),
            ("   ", "desc", 10),
            ("title", "", 10),
            ("title", "desc", 0),
        ];
        for (title, description, budget) in cases {
            let err = svc
                .create_job(principal("c"), title.into(), description.into(), budget, deadline())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValidationError);
        }

        let long_title = "x".repeat(MAX_TITLE_LEN + 1);
        let err = svc
            .create_job(principal("c"), long_title, "desc".into(), 10, deadline())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert!(svc.list_jobs(JobFilter::All).await.is_empty());
    }

    #[tokio::test]
    async fn delete_job_checks_owner_and_status() {
        let svc = service();
        let id = svc
            .create_job(principal("owner"), "Copy".into(), "Write copy".into(), 100, deadline())
            .await
            .unwrap();

        let err = svc.delete_job(id, &principal("stranger")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(svc.get_job(id).await.unwrap().status, JobStatus::Open);

        assert!(svc.delete_job(id, &principal("owner")).await.unwrap());
        assert_eq!(svc.get_job(id).await.unwrap().status, JobStatus::Deleted);

        let err = svc.delete_job(id, &principal("owner")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        let err = svc.delete_job(999, &principal("owner")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn deleted_jobs_drop_out_of_default_listings() {
        let svc = service();
        let keep = svc
            .create_job(principal("owner"), "A".into(), "a".into(), 1, deadline())
            .await
            .unwrap();
        let gone = svc
            .create_job(principal("owner"), "B".into(), "b".into(), 1, deadline())
            .await
            .unwrap();
        svc.delete_job(gone, &principal("owner")).await.unwrap();

        let ids: Vec<JobId> = svc.list_jobs(JobFilter::All).await.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![keep]);

        let deleted = svc.list_jobs(JobFilter::ByStatus(JobStatus::Deleted)).await;
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].id, gone);
    }

    #[tokio::test]
    async fn transition_is_compare_and_swap() {
        let svc = service();
        let id = svc
            .create_job(principal("owner"), "A".into(), "a".into(), 1, deadline())
            .await
            .unwrap();

        let job = svc.transition(id, JobStatus::Open, JobStatus::Deleted).await.unwrap();
        assert_eq!(job.status, JobStatus::Deleted);

        let err = svc
            .transition(id, JobStatus::Open, JobStatus::Deleted)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            err,
            ServiceError::Conflict {
                job_id: id,
                expected: JobStatus::Open,
                actual: JobStatus::Deleted,
            }
        );
    }

    #[tokio::test]
    async fn transition_refuses_edges_outside_the_lifecycle() {
        let svc = service();
        let id = svc
            .create_job(principal("owner"), "A".into(), "a".into(), 1, deadline())
            .await
            .unwrap();
        let history_before = svc.audit_service.job_history(id).await.unwrap().len();

        for (expected, to) in [
            (JobStatus::Open, JobStatus::Open),
            (JobStatus::Open, JobStatus::Completed),
            (JobStatus::Open, JobStatus::Disputed),
            (JobStatus::Assigned, JobStatus::Open),
            (JobStatus::Deleted, JobStatus::Open),
            (JobStatus::Disputed, JobStatus::Completed),
        ] {
            let err = svc.transition(id, expected, to).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidState, "{:?} -> {:?}", expected, to);
        }

        assert_eq!(svc.get_job(id).await.unwrap().status, JobStatus::Open);
        assert_eq!(svc.audit_service.job_history(id).await.unwrap().len(), history_before);
    }

    #[tokio::test]
    async fn listing_pages_in_insertion_order() {
        let svc = service();
        for n in 0..5 {
            svc.create_job(principal("owner"), format!("Job {}", n), "d".into(), 1, deadline())
                .await
                .unwrap();
        }

        let first = svc.list_jobs_page(JobFilter::All, None, Some(2)).await;
        assert_eq!(first.iter().map(|j| j.id).collect::<Vec<_>>(), vec![1, 2]);

        let next = svc.list_jobs_page(JobFilter::All, Some(2), Some(2)).await;
        assert_eq!(next.iter().map(|j| j.id).collect::<Vec<_>>(), vec![3, 4]);

        let rest = svc.list_jobs_page(JobFilter::All, Some(4), None).await;
        assert_eq!(rest.iter().map(|j| j.id).collect::<Vec<_>>(), vec![5]);
    }
}
