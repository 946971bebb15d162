use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jobmodel::PrincipalId;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobEventKind {
    JobPosted,
    JobDeleted,
    ProposalSubmitted,
    ProposalAccepted,
    ProposalRejected,
    StatusChanged,
    FundsLocked,
    FundsReleased,
    DisputeRaised,
}

/// One entry of a job's append-only history.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JobEvent {
    pub id: Uuid,
    pub seq: u64,
    pub kind: JobEventKind,
    pub actor: Option<PrincipalId>,
    pub description: String,
    pub metadata: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}
