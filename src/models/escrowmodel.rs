use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::jobmodel::{Amount, JobId, PrincipalId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    Unlocked,
    Locked,
    Disputed,
    Released,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EscrowTransition {
    pub from: LockStatus,
    pub to: LockStatus,
    pub action: String,
    pub actor: PrincipalId,
    pub timestamp: DateTime<Utc>,
}

/// Fund custody for an assigned job. One per job, created on acceptance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EscrowAccount {
    pub job_id: JobId,
    pub locked_amount: Amount,
    pub lock_status: LockStatus,
    pub transitions: Vec<EscrowTransition>,
    pub created_at: DateTime<Utc>,
}

impl EscrowAccount {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            locked_amount: 0,
            lock_status: LockStatus::Unlocked,
            transitions: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
