// db/jobdb.rs
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::db::{DBClient, JobRecord, JobTx};
use crate::models::{
    auditmodel::JobEvent,
    jobmodel::{Job, JobFilter, JobId, JobStatus, NewJob},
};

#[async_trait]
pub trait JobExt {
    async fn insert_job(&self, new_job: NewJob, posted: JobEvent) -> Job;

    async fn begin_job_tx(&self, job_id: JobId) -> Option<JobTx>;

    async fn lock_job(&self, job_id: JobId) -> Option<OwnedMutexGuard<JobRecord>>;

    async fn read_job<R, F>(&self, job_id: JobId, read: F) -> Option<R>
    where
        F: FnOnce(&JobRecord) -> R + Send,
        R: Send;

    async fn list_jobs(
        &self,
        filter: &JobFilter,
        after: Option<JobId>,
        limit: Option<usize>,
    ) -> Vec<Job>;
}

impl DBClient {
    async fn entry(&self, job_id: JobId) -> Option<Arc<Mutex<JobRecord>>> {
        self.jobs.read().await.get(&job_id).cloned()
    }
}

#[async_trait]
impl JobExt for DBClient {
    async fn insert_job(&self, new_job: NewJob, posted: JobEvent) -> Job {
        // Id allocation happens under the index write lock so ids and
        // index order always agree.
        let mut jobs = self.jobs.write().await;
        let id = self.next_job_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();

        let job = Job {
            id,
            client_id: new_job.client_id,
            title: new_job.title,
            description: new_job.description,
            budget: new_job.budget,
            deadline: new_job.deadline,
            status: JobStatus::Open,
            assigned_freelancer: None,
            proposals: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut record = JobRecord::new(job.clone());
        record.push_event(posted);
        jobs.insert(id, Arc::new(Mutex::new(record)));
        job
    }

    async fn begin_job_tx(&self, job_id: JobId) -> Option<JobTx> {
        let entry = self.entry(job_id).await?;
        Some(JobTx::new(entry.lock_owned().await))
    }

    async fn lock_job(&self, job_id: JobId) -> Option<OwnedMutexGuard<JobRecord>> {
        let entry = self.entry(job_id).await?;
        Some(entry.lock_owned().await)
    }

    async fn read_job<R, F>(&self, job_id: JobId, read: F) -> Option<R>
    where
        F: FnOnce(&JobRecord) -> R + Send,
        R: Send,
    {
        let entry = self.entry(job_id).await?;
        let record = entry.lock().await;
        Some(read(&record))
    }

    async fn list_jobs(
        &self,
        filter: &JobFilter,
        after: Option<JobId>,
        limit: Option<usize>,
    ) -> Vec<Job> {
        let entries: Vec<Arc<Mutex<JobRecord>>> = {
            let jobs = self.jobs.read().await;
            match after {
                Some(cursor) => jobs
                    .range(cursor.saturating_add(1)..)
                    .map(|(_, entry)| entry.clone())
                    .collect(),
                None => jobs.values().cloned().collect(),
            }
        };

        let limit = limit.unwrap_or(usize::MAX);
        let mut out = Vec::new();
        for entry in entries {
            if out.len() >= limit {
                break;
            }
            let record = entry.lock().await;
            if filter.matches(&record.job) {
                out.push(record.job.clone());
            }
        }
        out
    }
}
