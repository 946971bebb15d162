use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type JobId = u64;

/// Smallest currency unit.
pub type Amount = u64;

/// Opaque identity handed to us by the identity provider.
///
/// The only thing checked is that it is non-empty; the internal structure
/// belongs to whoever issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Assigned,
    Disputed,
    Completed,
    Deleted,
}

impl JobStatus {
    pub fn to_str(&self) -> &str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Assigned => "assigned",
            JobStatus::Disputed => "disputed",
            JobStatus::Completed => "completed",
            JobStatus::Deleted => "deleted",
        }
    }

    /// Edges of the job lifecycle. Everything else is refused.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Open, JobStatus::Deleted)
                | (JobStatus::Open, JobStatus::Assigned)
                | (JobStatus::Assigned, JobStatus::Disputed)
                | (JobStatus::Assigned, JobStatus::Completed)
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Proposal {
    pub freelancer_id: PrincipalId,
    pub cover_letter: String,
    pub proposed_budget: Option<Amount>,
    pub status: ProposalStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub client_id: PrincipalId,
    pub title: String,
    pub description: String,
    pub budget: Amount,
    pub deadline: NaiveDate,
    pub status: JobStatus,
    pub assigned_freelancer: Option<PrincipalId>,
    pub proposals: Vec<Proposal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn is_party(&self, principal: &PrincipalId) -> bool {
        self.client_id == *principal || self.assigned_freelancer.as_ref() == Some(principal)
    }

    /// The freelancer's live (Pending or Accepted) proposal, if any.
    pub fn active_proposal_index(&self, freelancer_id: &PrincipalId) -> Option<usize> {
        self.proposals
            .iter()
            .position(|p| p.freelancer_id == *freelancer_id && p.status != ProposalStatus::Rejected)
    }

    pub fn has_applicant(&self, freelancer_id: &PrincipalId) -> bool {
        self.proposals.iter().any(|p| p.freelancer_id == *freelancer_id)
    }
}

/// Everything needed to post a job, already validated.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub client_id: PrincipalId,
    pub title: String,
    pub description: String,
    pub budget: Amount,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    All,
    ByClient(PrincipalId),
    ByFreelancer(PrincipalId),
    ByApplicant(PrincipalId),
    ByStatus(JobStatus),
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        match self {
            JobFilter::ByStatus(status) => job.status == *status,
            _ if job.status == JobStatus::Deleted => false,
            JobFilter::All => true,
            JobFilter::ByClient(client) => job.client_id == *client,
            JobFilter::ByFreelancer(freelancer) => job.assigned_freelancer.as_ref() == Some(freelancer),
            JobFilter::ByApplicant(freelancer) => job.has_applicant(freelancer),
        }
    }
}
