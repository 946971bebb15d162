// models/chatmodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::jobmodel::{JobId, PrincipalId};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub seq: u64,
    pub sender_id: PrincipalId,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatThread {
    pub job_id: JobId,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl ChatThread {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Appends with a server-side sequence number. `sent_at` never goes
    /// backwards within a thread even if the wall clock does.
    pub fn append(&mut self, sender_id: PrincipalId, content: String) -> Message {
        let now = Utc::now();
        let (seq, sent_at) = match self.messages.last() {
            Some(last) => (last.seq + 1, now.max(last.sent_at)),
            None => (1, now),
        };

        let message = Message {
            seq,
            sender_id,
            content,
            sent_at,
        };
        self.messages.push(message.clone());
        message
    }
}
