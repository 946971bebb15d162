pub mod auditmodel;
pub mod chatmodel;
pub mod escrowmodel;
pub mod jobmodel;
