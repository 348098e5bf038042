use std::collections::BTreeSet;

use ats_core::{
    update, AppState, Candidate, CandidateStage, Effect, Msg, Note, ToastLevel, TOAST_TTL_TICKS,
};
use chrono::Utc;

fn candidate(n: usize, stage: CandidateStage) -> Candidate {
    let now = Utc::now();
    Candidate {
        id: format!("c{n}"),
        name: format!("Person {n:02}"),
        email: format!("person{n}@example.com"),
        phone: None,
        stage,
        job_id: "job-1".to_string(),
        notes: Vec::new(),
        timeline: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn with_candidates(count: usize) -> AppState {
    let candidates = (1..=count)
        .map(|n| {
            let stage = if n % 2 == 0 {
                CandidateStage::Screen
            } else {
                CandidateStage::Applied
            };
            candidate(n, stage)
        })
        .collect();
    let (mut state, _) = update(AppState::new(), Msg::CandidatesLoaded(candidates));
    state.consume_dirty();
    state
}

#[test]
fn tick_without_toasts_leaves_state_clean() {
    let state = with_candidates(2);
    let (mut state, effects) = update(state, Msg::Tick);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn note_is_sent_trimmed_and_appended_after_backend_confirms() {
    let (state, effects) = update(
        with_candidates(1),
        Msg::NoteSubmitted {
            candidate_id: "c1".to_string(),
            author: " recruiter ".to_string(),
            content: "  ping @hiring.manager  ".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::AppendNote {
            candidate_id: "c1".to_string(),
            author: "recruiter".to_string(),
            content: "ping @hiring.manager".to_string(),
        }]
    );
    assert!(state.candidate("c1").unwrap().notes.is_empty());
    assert_eq!(state.pending_requests(), 1);

    let note = Note {
        id: "note-1".to_string(),
        content: "ping @hiring.manager".to_string(),
        author: "recruiter".to_string(),
        mentions: BTreeSet::from(["hiring.manager".to_string()]),
        created_at: Utc::now(),
    };
    let (state, _) = update(
        state,
        Msg::NoteSettled {
            candidate_id: "c1".to_string(),
            result: Ok(note.clone()),
        },
    );
    assert_eq!(state.candidate("c1").unwrap().notes, vec![note]);
    assert_eq!(state.pending_requests(), 0);
    assert_eq!(state.toasts().last().unwrap().level, ToastLevel::Success);
}

#[test]
fn blank_note_or_unknown_candidate_sends_nothing() {
    let state = with_candidates(1);
    let (state, effects) = update(
        state,
        Msg::NoteSubmitted {
            candidate_id: "c1".to_string(),
            author: "me".to_string(),
            content: "   ".to_string(),
        },
    );
    assert!(effects.is_empty());
    let (_, effects) = update(
        state,
        Msg::NoteSubmitted {
            candidate_id: "nobody".to_string(),
            author: "me".to_string(),
            content: "hello".to_string(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn list_view_filters_and_paginates() {
    let state = with_candidates(25);
    let view = state.view();
    assert_eq!(view.list.total, 25);
    assert_eq!(view.list.total_pages, 3);
    assert_eq!(view.list.rows.len(), 10);

    let (state, _) = update(
        state,
        Msg::FilterChanged {
            search: None,
            stage: Some(CandidateStage::Screen),
        },
    );
    let view = state.view();
    assert_eq!(view.list.total, 12);
    assert!(view
        .list
        .rows
        .iter()
        .all(|row| row.stage == CandidateStage::Screen));

    let (state, _) = update(state, Msg::PageChanged(2));
    let view = state.view();
    assert_eq!(view.list.page, 2);
    assert_eq!(view.list.rows.len(), 2);

    let (state, _) = update(
        state,
        Msg::FilterChanged {
            search: Some("PERSON 07".to_string()),
            stage: None,
        },
    );
    let view = state.view();
    assert_eq!(view.list.page, 1);
    assert_eq!(view.list.rows.len(), 1);
    assert_eq!(view.list.rows[0].id, "c7");
}

#[test]
fn kanban_columns_follow_pipeline_order() {
    let view = with_candidates(5).view();
    let labels: Vec<_> = view.columns.iter().map(|c| c.label).collect();
    assert_eq!(
        labels,
        vec![
            "Applied",
            "Screening",
            "Technical Interview",
            "Offer",
            "Hired",
            "Rejected"
        ]
    );
    assert_eq!(view.column(CandidateStage::Applied).unwrap().cards.len(), 3);
    assert_eq!(view.column(CandidateStage::Screen).unwrap().cards.len(), 2);
}

#[test]
fn toasts_expire_after_ttl_ticks_or_dismissal() {
    let (state, _) = update(
        with_candidates(1),
        Msg::LoadFailed {
            what: "jobs".to_string(),
            message: "Network error".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::LoadFailed {
            what: "candidates".to_string(),
            message: "Network error".to_string(),
        },
    );
    assert_eq!(state.view().toasts.len(), 2);

    let first_id = state.view().toasts[0].id;
    let (mut state, _) = update(state, Msg::ToastDismissed(first_id));
    assert_eq!(state.view().toasts.len(), 1);

    for _ in 0..TOAST_TTL_TICKS {
        state = update(state, Msg::Tick).0;
    }
    assert!(state.view().toasts.is_empty());
}

#[test]
fn selection_shows_detail_and_clears_when_candidate_disappears() {
    let (state, _) = update(
        with_candidates(2),
        Msg::CandidateSelected(Some("c2".to_string())),
    );
    let detail = state.view().selected.unwrap();
    assert_eq!(detail.name, "Person 02");
    assert_eq!(detail.stage_label, "Screening");

    let (state, _) = update(
        state,
        Msg::CandidatesLoaded(vec![candidate(1, CandidateStage::Applied)]),
    );
    assert!(state.view().selected.is_none());

    let (state, _) = update(state, Msg::CandidateSelected(Some("ghost".to_string())));
    assert!(state.view().selected.is_none());
}
