pub mod audit_service;
pub mod chat_service;
pub mod error;
pub mod escrow_service;
pub mod job_service;
pub mod proposal_service;
pub mod query_service;
