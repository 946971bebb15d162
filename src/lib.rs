pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod utils;

use std::sync::Arc;

use config::Config;
use db::db::DBClient;
use service::{
    audit_service::AuditService,
    chat_service::ChatService,
    escrow_service::EscrowService,
    job_service::JobService,
    proposal_service::ProposalService,
    query_service::QueryService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub job_service: Arc<JobService>,
    pub proposal_service: Arc<ProposalService>,
    pub escrow_service: Arc<EscrowService>,
    pub chat_service: Arc<ChatService>,
    pub query_service: Arc<QueryService>,
    pub audit_service: Arc<AuditService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        let audit_service = Arc::new(AuditService::new(db_client_arc.clone()));
        let chat_service = Arc::new(ChatService::new(db_client_arc.clone()));
        let job_service = Arc::new(JobService::new(
            db_client_arc.clone(),
            audit_service.clone(),
        ));
        let escrow_service = Arc::new(EscrowService::new(
            db_client_arc.clone(),
            job_service.clone(),
            audit_service.clone(),
        ));
        let proposal_service = Arc::new(ProposalService::new(
            db_client_arc.clone(),
            job_service.clone(),
            escrow_service.clone(),
            chat_service.clone(),
            audit_service.clone(),
        ));
        let query_service = Arc::new(QueryService::new(
            db_client_arc.clone(),
            job_service.clone(),
            audit_service.clone(),
        ));

        Self {
            env: config,
            db_client: db_client_arc,
            job_service,
            proposal_service,
            escrow_service,
            chat_service,
            query_service,
            audit_service,
        }
    }
}
