use chrono::NaiveDate;
use gigledger::config::Config;
use gigledger::db::db::DBClient;
use gigledger::models::escrowmodel::LockStatus;
use gigledger::models::jobmodel::{JobFilter, JobId, JobStatus, PrincipalId, ProposalStatus};
use gigledger::service::error::{ErrorKind, ServiceError};
use gigledger::AppState;

fn principal(raw: &str) -> PrincipalId {
    PrincipalId::parse(raw).unwrap()
}

fn setup() -> AppState {
    AppState::new(DBClient::new(), Config::default())
}

async fn open_job(state: &AppState) -> JobId {
    state
        .job_service
        .create_job(
            principal("client"),
            "Logo".into(),
            "Design a logo".into(),
            500,
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn post_accept_lock_release() {
    let state = setup();
    let client = principal("client");
    let alice = principal("alice");
    let job_id = open_job(&state).await;

    state
        .proposal_service
        .submit_proposal(job_id, &alice, "I can do it".into(), None)
        .await
        .unwrap();
    state
        .proposal_service
        .accept_proposal(job_id, &client, &alice)
        .await
        .unwrap();

    let view = state.query_service.get_job_view(job_id).await.unwrap();
    assert_eq!(view.job.status, JobStatus::Assigned);
    assert_eq!(view.escrow.unwrap().lock_status, LockStatus::Unlocked);

    let escrow = state.escrow_service.lock_funds(job_id, &client, 500).await.unwrap();
    assert_eq!(escrow.lock_status, LockStatus::Locked);

    state.escrow_service.release_funds(job_id, &client).await.unwrap();

    let view = state.query_service.get_job_view(job_id).await.unwrap();
    assert_eq!(view.job.status, JobStatus::Completed);
    assert_eq!(view.escrow.unwrap().lock_status, LockStatus::Released);

    assert_eq!(
        state.query_service.get_freelancer_jobs(&alice).await.len(),
        1
    );
}

#[tokio::test]
async fn accepting_a_second_proposal_is_refused() {
    let state = setup();
    let client = principal("client");
    let job_id = open_job(&state).await;

    for freelancer in ["alice", "bob"] {
        state
            .proposal_service
            .submit_proposal(job_id, &principal(freelancer), "Hire me".into(), None)
            .await
            .unwrap();
    }

    state
        .proposal_service
        .accept_proposal(job_id, &client, &principal("alice"))
        .await
        .unwrap();
    let err = state
        .proposal_service
        .accept_proposal(job_id, &client, &principal("bob"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let job = state.job_service.get_job(job_id).await.unwrap();
    assert_eq!(job.proposals[0].status, ProposalStatus::Accepted);
    assert_eq!(job.proposals[1].status, ProposalStatus::Rejected);
    assert_eq!(job.assigned_freelancer, Some(principal("alice")));
}

#[tokio::test]
async fn over_budget_lock_leaves_escrow_untouched() {
    let state = setup();
    let client = principal("client");
    let job_id = open_job(&state).await;
    state
        .proposal_service
        .submit_proposal(job_id, &principal("alice"), "I can do it".into(), Some(450))
        .await
        .unwrap();
    state
        .proposal_service
        .accept_proposal(job_id, &client, &principal("alice"))
        .await
        .unwrap();

    let history_before = state.query_service.get_job_history(job_id).await.unwrap();
    let err = state
        .escrow_service
        .lock_funds(job_id, &client, 600)
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::AmountExceedsBudget { amount: 600, budget: 500 });

    let escrow = state.escrow_service.get_escrow(job_id).await.unwrap();
    assert_eq!(escrow.lock_status, LockStatus::Unlocked);
    assert_eq!(escrow.locked_amount, 0);
    assert_eq!(
        state.query_service.get_job_history(job_id).await.unwrap(),
        history_before
    );
}

#[tokio::test]
async fn deleted_job_is_closed_to_everyone() {
    let state = setup();
    let job_id = open_job(&state).await;
    state
        .proposal_service
        .submit_proposal(job_id, &principal("alice"), "I can do it".into(), None)
        .await
        .unwrap();

    assert!(state.job_service.delete_job(job_id, &principal("client")).await.unwrap());

    let err = state
        .chat_service
        .send_message(job_id, &principal("client"), "still there?".into())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = state
        .proposal_service
        .accept_proposal(job_id, &principal("client"), &principal("alice"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    assert!(state.query_service.get_jobs(JobFilter::All, None, None).await.is_empty());
    assert!(state.query_service.get_applied_jobs(&principal("alice")).await.is_empty());
    assert_eq!(
        state.job_service.get_job(job_id).await.unwrap().status,
        JobStatus::Deleted
    );
}

#[tokio::test]
async fn assigned_job_cannot_be_deleted() {
    let state = setup();
    let client = principal("client");
    let job_id = open_job(&state).await;
    state
        .proposal_service
        .submit_proposal(job_id, &principal("alice"), "I can do it".into(), None)
        .await
        .unwrap();
    state
        .proposal_service
        .accept_proposal(job_id, &client, &principal("alice"))
        .await
        .unwrap();

    let err = state.job_service.delete_job(job_id, &client).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(
        state.job_service.get_job(job_id).await.unwrap().status,
        JobStatus::Assigned
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_messages_keep_a_gapless_sequence() {
    let state = setup();
    let client = principal("client");
    let job_id = open_job(&state).await;
    state
        .proposal_service
        .submit_proposal(job_id, &principal("alice"), "I can do it".into(), None)
        .await
        .unwrap();
    state
        .proposal_service
        .accept_proposal(job_id, &client, &principal("alice"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for n in 0..20 {
        let chat = state.chat_service.clone();
        let sender = if n % 2 == 0 { principal("client") } else { principal("alice") };
        handles.push(tokio::spawn(async move {
            chat.send_message(job_id, &sender, format!("message {}", n)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let messages = state.chat_service.get_messages(job_id).await.unwrap();
    let seqs: Vec<u64> = messages.iter().map(|m| m.seq).collect();
    assert_eq!(seqs, (1..=20).collect::<Vec<u64>>());
}
