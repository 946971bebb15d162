// service/chat_service.rs
use std::sync::Arc;

use crate::{
    db::{
        db::{DBClient, JobTx},
        jobdb::JobExt,
    },
    models::{
        chatmodel::Message,
        jobmodel::{JobId, JobStatus, PrincipalId},
    },
    service::error::ServiceError,
};

pub const MAX_MESSAGE_LEN: usize = 1000;

/// Per-job message log. Only the client and the assigned freelancer get in.
#[derive(Debug, Clone)]
pub struct ChatService {
    db_client: Arc<DBClient>,
}

impl ChatService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub(crate) fn open_thread_in(&self, tx: &mut JobTx) {
        if !tx.has_thread() {
            tx.open_thread();
        }
    }

    /// Idempotent; a job that was never assigned cannot have a thread.
    pub async fn open_thread(&self, job_id: JobId) -> Result<(), ServiceError> {
        let mut tx = self
            .db_client
            .begin_job_tx(job_id)
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if tx.has_thread() {
            return Ok(());
        }
        if tx.escrow.is_none() {
            return Err(ServiceError::InvalidJobStatus(job_id, tx.job.status));
        }

        self.open_thread_in(&mut tx);
        tx.commit();
        Ok(())
    }

    pub async fn send_message(
        &self,
        job_id: JobId,
        sender_id: &PrincipalId,
        content: String,
    ) -> Result<Message, ServiceError> {
        let mut record = self
            .db_client
            .lock_job(job_id)
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?;
        let record = &mut *record;

        if !record.job.is_party(sender_id) || record.job.status == JobStatus::Deleted {
            return Err(ServiceError::UnauthorizedJobAccess(sender_id.clone(), job_id));
        }

        if content.trim().is_empty() || content.chars().count() > MAX_MESSAGE_LEN {
            return Err(ServiceError::Validation(format!(
                "Message must be between 1 and {} characters",
                MAX_MESSAGE_LEN
            )));
        }

        let thread = record
            .chat
            .as_mut()
            .ok_or(ServiceError::ThreadNotFound(job_id))?;
        let message = thread.append(sender_id.clone(), content);

        tracing::debug!("Message {} on job {} from {}", message.seq, job_id, sender_id);
        Ok(message)
    }

    pub async fn get_messages(&self, job_id: JobId) -> Result<Vec<Message>, ServiceError> {
        self.db_client
            .read_job(job_id, |record| record.chat.as_ref().map(|t| t.messages.clone()))
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?
            .ok_or(ServiceError::ThreadNotFound(job_id))
    }

    /// Same as [`ChatService::get_messages`], restricted to the job's parties.
    pub async fn get_messages_for(
        &self,
        job_id: JobId,
        requester_id: &PrincipalId,
    ) -> Result<Vec<Message>, ServiceError> {
        let messages = self
            .db_client
            .read_job(job_id, |record| {
                if !record.job.is_party(requester_id) {
                    return Err(ServiceError::UnauthorizedJobAccess(requester_id.clone(), job_id));
                }
                record
                    .chat
                    .as_ref()
                    .map(|t| t.messages.clone())
                    .ok_or(ServiceError::ThreadNotFound(job_id))
            })
            .await
            .ok_or(ServiceError::JobNotFound(job_id))??;

        Ok(messages)
    }
}
