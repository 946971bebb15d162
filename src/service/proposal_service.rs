// service/proposal_service.rs
use std::sync::Arc;

use chrono::Utc;

use crate::{
    db::{db::DBClient, jobdb::JobExt},
    models::jobmodel::*,
    service::{
        audit_service::AuditService,
        chat_service::ChatService,
        error::ServiceError,
        escrow_service::EscrowService,
        job_service::JobService,
    },
};

pub const MAX_COVER_LETTER_LEN: usize = 500;

fn validate_proposal(cover_letter: &str, proposed_budget: Option<Amount>) -> Result<(), ServiceError> {
    if cover_letter.trim().is_empty() || cover_letter.chars().count() > MAX_COVER_LETTER_LEN {
        return Err(ServiceError::Validation(format!(
            "Cover letter must be between 1 and {} characters",
            MAX_COVER_LETTER_LEN
        )));
    }

    if proposed_budget == Some(0) {
        return Err(ServiceError::Validation(
            "Proposed budget must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct ProposalService {
    db_client: Arc<DBClient>,
    job_service: Arc<JobService>,
    escrow_service: Arc<EscrowService>,
    chat_service: Arc<ChatService>,
    audit_service: Arc<AuditService>,
}

impl ProposalService {
    pub fn new(
        db_client: Arc<DBClient>,
        job_service: Arc<JobService>,
        escrow_service: Arc<EscrowService>,
        chat_service: Arc<ChatService>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self {
            db_client,
            job_service,
            escrow_service,
            chat_service,
            audit_service,
        }
    }

    /// Returns the proposal's position in the job's list.
    pub async fn submit_proposal(
        &self,
        job_id: JobId,
        freelancer_id: &PrincipalId,
        cover_letter: String,
        proposed_budget: Option<Amount>,
    ) -> Result<usize, ServiceError> {
        validate_proposal(&cover_letter, proposed_budget)?;

        let mut tx = self
            .db_client
            .begin_job_tx(job_id)
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if tx.job.client_id == *freelancer_id {
            return Err(ServiceError::Validation(
                "Clients cannot submit proposals on their own job".to_string(),
            ));
        }

        if tx.job.status != JobStatus::Open {
            return Err(ServiceError::InvalidJobStatus(job_id, tx.job.status));
        }

        if tx.job.active_proposal_index(freelancer_id).is_some() {
            return Err(ServiceError::DuplicateProposal {
                job_id,
                freelancer_id: freelancer_id.clone(),
            });
        }

        let now = Utc::now();
        let proposal = Proposal {
            freelancer_id: freelancer_id.clone(),
            cover_letter,
            proposed_budget,
            status: ProposalStatus::Pending,
            submitted_at: now,
        };
        tx.job.proposals.push(proposal.clone());
        tx.job.updated_at = now;
        let index = tx.job.proposals.len() - 1;

        self.audit_service.log_proposal_submission(&mut tx, index, &proposal);
        tx.commit();

        tracing::info!("Proposal {} from {} on job {}", index, freelancer_id, job_id);
        Ok(index)
    }

    /// Accepts one proposal and turns the job into an assignment in a single
    /// step: proposals settled, job Assigned, escrow and chat opened.
    pub async fn accept_proposal(
        &self,
        job_id: JobId,
        client_id: &PrincipalId,
        freelancer_id: &PrincipalId,
    ) -> Result<Job, ServiceError> {
        let mut tx = self
            .db_client
            .begin_job_tx(job_id)
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if tx.job.client_id != *client_id {
            return Err(ServiceError::UnauthorizedJobAccess(client_id.clone(), job_id));
        }

        // A second accept, duplicate or racing, fails here.
        self.job_service
            .transition_in(&mut tx, JobStatus::Open, JobStatus::Assigned, Some(client_id))
            .map_err(ServiceError::into_invalid_state)?;

        let accepted = tx
            .job
            .active_proposal_index(freelancer_id)
            .ok_or_else(|| ServiceError::ProposalNotFound {
                job_id,
                freelancer_id: freelancer_id.clone(),
            })?;

        let mut auto_rejected = Vec::new();
        for (index, proposal) in tx.job.proposals.iter_mut().enumerate() {
            if index == accepted {
                proposal.status = ProposalStatus::Accepted;
            } else if proposal.status == ProposalStatus::Pending {
                proposal.status = ProposalStatus::Rejected;
                auto_rejected.push(proposal.freelancer_id.clone());
            }
        }
        tx.job.assigned_freelancer = Some(freelancer_id.clone());

        self.escrow_service.open_escrow(&mut tx);
        self.chat_service.open_thread_in(&mut tx);
        self.audit_service
            .log_proposal_acceptance(&mut tx, client_id, freelancer_id, &auto_rejected);
        let job = tx.commit();

        tracing::info!(
            "Job {} assigned to {} ({} other proposals rejected)",
            job_id,
            freelancer_id,
            auto_rejected.len()
        );
        Ok(job)
    }

    /// Rejecting a proposal that is already rejected is a successful no-op.
    pub async fn reject_proposal(
        &self,
        job_id: JobId,
        client_id: &PrincipalId,
        freelancer_id: &PrincipalId,
    ) -> Result<(), ServiceError> {
        let mut tx = self
            .db_client
            .begin_job_tx(job_id)
            .await
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if tx.job.client_id != *client_id {
            return Err(ServiceError::UnauthorizedJobAccess(client_id.clone(), job_id));
        }

        let index = match tx.job.active_proposal_index(freelancer_id) {
            Some(index) => index,
            None if tx.job.has_applicant(freelancer_id) => return Ok(()),
            None => {
                return Err(ServiceError::ProposalNotFound {
                    job_id,
                    freelancer_id: freelancer_id.clone(),
                })
            }
        };

        if tx.job.proposals[index].status == ProposalStatus::Accepted {
            return Err(ServiceError::InvalidProposalStatus {
                job_id,
                freelancer_id: freelancer_id.clone(),
                status: "accepted".to_string(),
            });
        }

        if tx.job.status != JobStatus::Open {
            return Err(ServiceError::InvalidJobStatus(job_id, tx.job.status));
        }

        tx.job.proposals[index].status = ProposalStatus::Rejected;
        tx.job.updated_at = Utc::now();
        self.audit_service
            .log_proposal_rejection(&mut tx, client_id, freelancer_id);
        tx.commit();

        tracing::info!("Proposal from {} on job {} rejected", freelancer_id, job_id);
        Ok(())
    }
}
