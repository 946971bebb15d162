pub mod chat;
pub mod escrow;
pub mod jobs;
