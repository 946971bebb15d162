// service/escrow_service.rs
use std::sync::Arc;

use chrono::Utc;

use crate::{
    db::{
        db::{DBClient, JobTx},
        jobdb::JobExt,
    },
    models::{
        auditmodel::JobEventKind,
        escrowmodel::{EscrowAccount, EscrowTransition, LockStatus},
        jobmodel::{Amount, JobId, JobStatus, PrincipalId},
    },
    service::{audit_service::AuditService, error::ServiceError, job_service::JobService},
};

impl EscrowAccount {
    pub fn transition(
        &mut self,
        to: LockStatus,
        action: &str,
        actor: &PrincipalId,
    ) -> Result<EscrowTransition, ServiceError> {
        if !self.is_valid_transition(to) {
            return Err(ServiceError::invalid_escrow(self.job_id, self.lock_status, to));
        }

        let transition = EscrowTransition {
            from: self.lock_status,
            to,
            action: action.to_string(),
            actor: actor.clone(),
            timestamp: Utc::now(),
        };

        self.transitions.push(transition.clone());
        self.lock_status = to;

        Ok(transition)
    }

    // Disputed has no way out here; resolution belongs to an outside arbiter.
    fn is_valid_transition(&self, to: LockStatus) -> bool {
        matches!(
            (self.lock_status, to),
            (LockStatus::Unlocked, LockStatus::Locked)
                | (LockStatus::Locked, LockStatus::Released)
                | (LockStatus::Locked, LockStatus::Disputed)
        )
    }
}

#[derive(Debug, Clone)]
pub struct EscrowService {
    db_client: Arc<DBClient>,
    job_service: Arc<JobService>,
    audit_service: Arc<AuditService>,
}

impl EscrowService {
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

    /// Creates the Unlocked account for a job being assigned. A job that
    /// already has one keeps it.
    pub(crate) fn open_escrow(&self, tx: &mut JobTx) {
        if tx.escrow.is_none() {
            tx.escrow = Some(EscrowAccount::new(tx.job.id));
        }
    }

    pub async fn lock_funds(
        &self,
        job_id: JobId,
        client_id: &PrincipalId,
        amount: Amount,
    ) -> Result<EscrowAccount, ServiceError> {
        if amount == 0 {
            return Err(ServiceError::Validation("Amount must be greater than 0".to_string()));
        }

        let mut tx = self
            .db_client
            .begin_job_tx(job_id)
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if tx.job.client_id != *client_id {
            return Err(ServiceError::UnauthorizedJobAccess(client_id.clone(), job_id));
        }

        if tx.job.status != JobStatus::Assigned {
            return Err(ServiceError::InvalidJobStatus(job_id, tx.job.status));
        }

        let budget = tx.job.budget;
        let escrow = tx
            .escrow
            .as_mut()
            .ok_or(ServiceError::EscrowNotFound(job_id))?;

        if escrow.lock_status != LockStatus::Unlocked {
            return Err(ServiceError::invalid_escrow(job_id, escrow.lock_status, LockStatus::Locked));
        }

        if amount > budget {
            return Err(ServiceError::AmountExceedsBudget { amount, budget });
        }

        escrow.transition(LockStatus::Locked, "lock_funds", client_id)?;
        escrow.locked_amount = amount;
        let snapshot = escrow.clone();

        self.audit_service.log_escrow_activity(
            &mut tx,
            JobEventKind::FundsLocked,
            client_id,
            &snapshot,
            Some(serde_json::json!({ "budget": budget })),
        );
        tx.commit();

        tracing::info!("Escrow for job {} locked {} by {}", job_id, amount, client_id);
        Ok(snapshot)
    }

    pub async fn raise_dispute(
        &self,
        job_id: JobId,
        requester_id: &PrincipalId,
        reason: Option<String>,
    ) -> Result<EscrowAccount, ServiceError> {
        let mut tx = self
            .db_client
            .begin_job_tx(job_id)
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if !tx.job.is_party(requester_id) {
            return Err(ServiceError::UnauthorizedJobAccess(requester_id.clone(), job_id));
        }

        let status = tx.job.status;
        let escrow = tx
            .escrow
            .as_mut()
            .ok_or(ServiceError::InvalidJobStatus(job_id, status))?;
        escrow.transition(LockStatus::Disputed, "raise_dispute", requester_id)?;
        let snapshot = escrow.clone();

        self.job_service
            .transition_in(&mut tx, JobStatus::Assigned, JobStatus::Disputed, Some(requester_id))
            .map_err(ServiceError::into_invalid_state)?;

        self.audit_service.log_escrow_activity(
            &mut tx,
            JobEventKind::DisputeRaised,
            requester_id,
            &snapshot,
            Some(serde_json::json!({ "reason": reason })),
        );
        tx.commit();

        tracing::warn!("Dispute raised on job {} by {}", job_id, requester_id);
        Ok(snapshot)
    }

    pub async fn release_funds(
        &self,
        job_id: JobId,
        client_id: &PrincipalId,
    ) -> Result<EscrowAccount, ServiceError> {
        let mut tx = self
            .db_client
            .begin_job_tx(job_id)
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if tx.job.client_id != *client_id {
            return Err(ServiceError::UnauthorizedJobAccess(client_id.clone(), job_id));
        }

        let status = tx.job.status;
        let escrow = tx
            .escrow
            .as_mut()
            .ok_or(ServiceError::InvalidJobStatus(job_id, status))?;
        escrow.transition(LockStatus::Released, "release_funds", client_id)?;
        let snapshot = escrow.clone();

        self.job_service
            .transition_in(&mut tx, JobStatus::Assigned, JobStatus::Completed, Some(client_id))
            .map_err(ServiceError::into_invalid_state)?;

        self.audit_service.log_escrow_activity(
            &mut tx,
            JobEventKind::FundsReleased,
            client_id,
            &snapshot,
            None,
        );
        let freelancer = tx.commit().assigned_freelancer;

        tracing::info!(
            "Escrow for job {} released {} to {:?}",
            job_id,
            snapshot.locked_amount,
            freelancer
        );
        Ok(snapshot)
    }

    pub async fn get_escrow(&self, job_id: JobId) -> Result<EscrowAccount, ServiceError> {
        self.db_client
            .read_job(job_id, |record| record.escrow.clone())
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?
            .ok_or(ServiceError::EscrowNotFound(job_id))
    }
}
