use std::sync::{Arc, Once};
use std::time::Duration;

use ats_core::{CandidateStage, NewCandidate, NewJob};
use ats_engine::{
    EngineCommand, EngineEvent, EngineHandle, EntityStore, GatewaySettings, MutationGateway,
    NeverFail, Operation, ScriptedFaultPolicy,
};

const WAIT: Duration = Duration::from_secs(5);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ats_logging::initialize_for_tests);
}

fn engine(faults: Arc<dyn ats_engine::FaultPolicy>) -> (Arc<EntityStore>, EngineHandle) {
    init_logging();
    let store = EntityStore::new();
    let job = store.create_job(NewJob::titled("Alpha"));
    store.create_job(NewJob::titled("Beta"));
    store
        .create_candidate(NewCandidate {
            name: "Annie Easley".into(),
            email: "annie@example.com".into(),
            phone: None,
            job_id: job.id,
            stage: None,
        })
        .unwrap();
    let store = Arc::new(store);
    let gateway = Arc::new(MutationGateway::with_fault_policy(
        store.clone(),
        GatewaySettings::immediate(),
        faults,
    ));
    let handle = EngineHandle::new(gateway.clone(), gateway).unwrap();
    (store, handle)
}

#[test]
fn load_commands_return_store_contents() {
    let (_store, handle) = engine(Arc::new(NeverFail));

    handle.submit(EngineCommand::LoadJobs);
    let Some(EngineEvent::JobsLoaded(Ok(jobs))) = handle.recv_timeout(WAIT) else {
        panic!("expected jobs");
    };
    assert_eq!(jobs.len(), 2);

    handle.submit(EngineCommand::LoadCandidates);
    let Some(EngineEvent::CandidatesLoaded(Ok(candidates))) = handle.recv_timeout(WAIT) else {
        panic!("expected candidates");
    };
    assert_eq!(candidates[0].name, "Annie Easley");
}

#[test]
fn stage_command_settles_with_request_id() {
    let (store, handle) = engine(Arc::new(NeverFail));

    handle.submit(EngineCommand::PersistStage {
        request_id: 42,
        candidate_id: "cand-3".into(),
        stage: CandidateStage::Screen,
    });

    let Some(EngineEvent::StageSettled { request_id, result }) = handle.recv_timeout(WAIT) else {
        panic!("expected a stage settlement");
    };
    assert_eq!(request_id, 42);
    let settled = result.unwrap();
    let stored = store.get_candidate("cand-3").unwrap();
    assert_eq!(stored.stage, CandidateStage::Screen);
    // The event carries the record with its new timeline entry.
    assert_eq!(settled, stored);
    assert_eq!(settled.timeline.last().unwrap().to, CandidateStage::Screen);
}

#[test]
fn failed_reorder_settles_with_message() {
    let (store, handle) = engine(Arc::new(ScriptedFaultPolicy::new(
        Operation::ReorderJob,
        [true],
    )));

    handle.submit(EngineCommand::PersistReorder {
        request_id: 7,
        job_id: "job-1".into(),
        from_order: 1,
        to_order: 2,
    });

    assert_eq!(
        handle.recv_timeout(WAIT),
        Some(EngineEvent::ReorderSettled {
            request_id: 7,
            result: Err("Network error: Failed to reorder job".into())
        })
    );
    assert_eq!(store.get_job("job-1").unwrap().order, 1);
}

#[test]
fn note_command_returns_created_note() {
    let (_store, handle) = engine(Arc::new(NeverFail));

    handle.submit(EngineCommand::AppendNote {
        candidate_id: "cand-3".into(),
        author: "recruiter".into(),
        content: "Ping @lead".into(),
    });

    let Some(EngineEvent::NoteSettled {
        candidate_id,
        result: Ok(note),
    }) = handle.recv_timeout(WAIT)
    else {
        panic!("expected note");
    };
    assert_eq!(candidate_id, "cand-3");
    assert!(note.mentions.contains("lead"));
    assert!(handle.try_recv().is_none());
}
