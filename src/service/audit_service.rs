// service/audit_service.rs
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{
        db::{DBClient, JobTx},
        jobdb::JobExt,
    },
    models::{
        auditmodel::{JobEvent, JobEventKind},
        escrowmodel::EscrowAccount,
        jobmodel::{JobId, JobStatus, PrincipalId, Proposal},
    },
    service::error::ServiceError,
};

/// Writes the append-only job history. Events are staged on the job
/// transaction so they land if and only if the change itself commits.
#[derive(Debug, Clone)]
pub struct AuditService {
    db_client: Arc<DBClient>,
}

impl AuditService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub fn job_posted_event(&self, client_id: &PrincipalId, title: &str, budget: u64) -> JobEvent {
        Self::build_event(
            JobEventKind::JobPosted,
            Some(client_id.clone()),
            serde_json::json!({
                "job_title": title,
                "budget": budget,
            }),
            "Job posted".to_string(),
        )
    }

    pub fn log_job_deletion(&self, tx: &mut JobTx, requester_id: &PrincipalId) {
        let proposal_count = tx.job.proposals.len();
        self.log_audit_event(
            tx,
            JobEventKind::JobDeleted,
            Some(requester_id.clone()),
            serde_json::json!({ "proposal_count": proposal_count }),
            "Job deleted by client".to_string(),
        );
    }

    pub fn log_proposal_submission(&self, tx: &mut JobTx, index: usize, proposal: &Proposal) {
        self.log_audit_event(
            tx,
            JobEventKind::ProposalSubmitted,
            Some(proposal.freelancer_id.clone()),
            serde_json::json!({
                "index": index,
                "proposed_budget": proposal.proposed_budget,
            }),
            "Proposal submitted".to_string(),
        );
    }

    pub fn log_proposal_acceptance(
        &self,
        tx: &mut JobTx,
        client_id: &PrincipalId,
        freelancer_id: &PrincipalId,
        rejected: &[PrincipalId],
    ) {
        self.log_audit_event(
            tx,
            JobEventKind::ProposalAccepted,
            Some(client_id.clone()),
            serde_json::json!({
                "freelancer_id": freelancer_id,
                "auto_rejected": rejected,
            }),
            format!("Proposal from {} accepted", freelancer_id),
        );
    }

    pub fn log_proposal_rejection(
        &self,
        tx: &mut JobTx,
        client_id: &PrincipalId,
        freelancer_id: &PrincipalId,
    ) {
        self.log_audit_event(
            tx,
            JobEventKind::ProposalRejected,
            Some(client_id.clone()),
            serde_json::json!({ "freelancer_id": freelancer_id }),
            format!("Proposal from {} rejected", freelancer_id),
        );
    }

    pub fn log_status_change(
        &self,
        tx: &mut JobTx,
        actor: Option<&PrincipalId>,
        from: JobStatus,
        to: JobStatus,
    ) {
        self.log_audit_event(
            tx,
            JobEventKind::StatusChanged,
            actor.cloned(),
            serde_json::json!({
                "from": from.to_str(),
                "to": to.to_str(),
            }),
            format!("Job status {} -> {}", from.to_str(), to.to_str()),
        );
    }

    pub fn log_escrow_activity(
        &self,
        tx: &mut JobTx,
        kind: JobEventKind,
        actor: &PrincipalId,
        escrow: &EscrowAccount,
        metadata: Option<serde_json::Value>,
    ) {
        let mut meta = metadata.unwrap_or(serde_json::json!({}));
        meta["locked_amount"] = serde_json::json!(escrow.locked_amount);
        meta["lock_status"] = serde_json::json!(escrow.lock_status);

        self.log_audit_event(
            tx,
            kind,
            Some(actor.clone()),
            meta,
            format!("Escrow {:?}", escrow.lock_status),
        );
    }

    pub async fn job_history(&self, job_id: JobId) -> Result<Vec<JobEvent>, ServiceError> {
        self.db_client
            .read_job(job_id, |record| record.history.clone())
            .await
            .ok_or(ServiceError::JobNotFound(job_id))
    }

    fn log_audit_event(
        &self,
        tx: &mut JobTx,
        kind: JobEventKind,
        actor: Option<PrincipalId>,
        metadata: serde_json::Value,
        description: String,
    ) {
        tracing::debug!("Audit [{}] {:?}: {}", tx.job.id, kind, description);
        tx.record_event(Self::build_event(kind, actor, metadata, description));
    }

    fn build_event(
        kind: JobEventKind,
        actor: Option<PrincipalId>,
        metadata: serde_json::Value,
        description: String,
    ) -> JobEvent {
        JobEvent {
            id: Uuid::new_v4(),
            seq: 0,
            kind,
            actor,
            description,
            metadata,
            recorded_at: Utc::now(),
        }
    }
}

