// db/db.rs
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::models::{
    auditmodel::JobEvent,
    chatmodel::ChatThread,
    escrowmodel::EscrowAccount,
    jobmodel::{Job, JobId},
};

/// Everything the ledger knows about one job. Guarded as a unit so a job,
/// its escrow, its thread and its history never disagree.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job: Job,
    pub escrow: Option<EscrowAccount>,
    pub chat: Option<ChatThread>,
    pub history: Vec<JobEvent>,
}

impl JobRecord {
    pub fn new(job: Job) -> Self {
        Self {
            job,
            escrow: None,
            chat: None,
            history: Vec::new(),
        }
    }

    pub fn push_event(&mut self, mut event: JobEvent) {
        event.seq = self.history.len() as u64 + 1;
        self.history.push(event);
    }
}

/// In-memory job ledger.
///
/// The index lock is only held to look up or insert an entry; each job has
/// its own mutex, so work on different jobs never contends.
pub struct DBClient {
    pub(crate) jobs: RwLock<BTreeMap<JobId, Arc<Mutex<JobRecord>>>>,
    pub(crate) next_job_id: AtomicU64,
}

impl std::fmt::Debug for DBClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DBClient")
            .field("jobs", &"RwLock<BTreeMap<JobId, JobRecord>>")
            .field("next_job_id", &self.next_job_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for DBClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DBClient {
    pub fn new() -> Self {
        DBClient {
            jobs: RwLock::new(BTreeMap::new()),
            next_job_id: AtomicU64::new(1),
        }
    }
}

/// A unit of work against a single job.
///
/// Holds the job's lock for its whole lifetime. Changes go to working
/// copies and only land in the record on [`JobTx::commit`]; dropping the
/// transaction discards them.
pub struct JobTx {
    guard: OwnedMutexGuard<JobRecord>,
    pub job: Job,
    pub escrow: Option<EscrowAccount>,
    open_thread: bool,
    events: Vec<JobEvent>,
}

impl JobTx {
    pub(crate) fn new(guard: OwnedMutexGuard<JobRecord>) -> Self {
        let job = guard.job.clone();
        let escrow = guard.escrow.clone();
        Self {
            guard,
            job,
            escrow,
            open_thread: false,
            events: Vec::new(),
        }
    }

    pub fn has_thread(&self) -> bool {
        self.open_thread || self.guard.chat.is_some()
    }

    pub fn open_thread(&mut self) {
        self.open_thread = true;
    }

    pub fn record_event(&mut self, event: JobEvent) {
        self.events.push(event);
    }

    pub fn commit(self) -> Job {
        let JobTx {
            mut guard,
            job,
            escrow,
            open_thread,
            events,
        } = self;

        if open_thread && guard.chat.is_none() {
            guard.chat = Some(ChatThread::new(job.id));
        }
        for event in events {
            guard.push_event(event);
        }
        guard.escrow = escrow;
        guard.job = job.clone();
        job
    }
}
