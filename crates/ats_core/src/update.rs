use crate::pipeline::{apply_stage_change, StageChange};
use crate::state::{PendingReorder, PendingStage};
use crate::{plan_reorder, AppState, Effect, Msg, Toast};

/// Pure update function: applies a message to state and returns any effects.
///
/// Drags are applied to local state before any effect is returned, so the
/// caller can render the optimistic result while the backend call runs.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::JobsLoaded(jobs) => {
            state.set_jobs(jobs);
            Vec::new()
        }
        Msg::CandidatesLoaded(candidates) => {
            state.set_candidates(candidates);
            Vec::new()
        }
        Msg::LoadFailed { what, message } => {
            state.push_toast(Toast::error(format!("Failed to load {what}"), message));
            Vec::new()
        }
        Msg::CandidateDropped {
            candidate_id,
            stage,
        } => {
            // In-flight changes for the same candidate are not serialized; the
            // last answer to arrive decides what is shown.
            match apply_stage_change(state.candidates_mut(), &candidate_id, stage) {
                StageChange::Missing | StageChange::Unchanged => Vec::new(),
                StageChange::Moved { candidate_name, .. } => {
                    let request_id = state.next_request_id();
                    state.track_stage(
                        request_id,
                        PendingStage {
                            candidate_id: candidate_id.clone(),
                            candidate_name,
                            stage,
                        },
                    );
                    state.mark_dirty();
                    vec![Effect::PersistStage {
                        request_id,
                        candidate_id,
                        stage,
                    }]
                }
            }
        }
        Msg::StageChangeSettled { request_id, result } => {
            let Some(pending) = state.take_stage(request_id) else {
                return (state, Vec::new());
            };
            state.mark_dirty();
            match result {
                Ok(stored) => {
                    state.confirm_stage_history(&stored);
                    state.push_toast(Toast::stage_changed(&pending.candidate_name, pending.stage));
                    Vec::new()
                }
                Err(_) => {
                    // Full reload, not a single-field undo.
                    state.push_toast(Toast::stage_change_failed(&pending.candidate_name));
                    vec![Effect::LoadCandidates]
                }
            }
        }
        Msg::JobDragged {
            from_index,
            to_index,
        } => match plan_reorder(state.jobs(), from_index, to_index) {
            None => Vec::new(),
            Some(plan) => {
                let request_id = state.next_request_id();
                let snapshot = state.jobs().to_vec();
                let title = plan
                    .jobs
                    .iter()
                    .find(|job| job.id == plan.job_id)
                    .map(|job| job.title.clone())
                    .unwrap_or_default();
                state.track_reorder(
                    request_id,
                    PendingReorder {
                        job_id: plan.job_id.clone(),
                        title,
                        snapshot,
                    },
                );
                state.set_jobs(plan.jobs);
                vec![Effect::PersistReorder {
                    request_id,
                    job_id: plan.job_id,
                    from_order: plan.from_order,
                    to_order: plan.to_order,
                }]
            }
        },
        Msg::JobReorderSettled { request_id, result } => {
            let Some(pending) = state.take_reorder(request_id) else {
                return (state, Vec::new());
            };
            state.mark_dirty();
            match result {
                Ok(()) => {
                    state.push_toast(Toast::jobs_reordered(&pending.title));
                    Vec::new()
                }
                Err(message) => {
                    // The snapshot can include a later reorder that has not
                    // settled yet, so the store's order is fetched as well.
                    state.set_jobs(pending.snapshot);
                    state.push_toast(Toast::reorder_failed(&message));
                    vec![Effect::LoadJobs]
                }
            }
        }
        Msg::NoteSubmitted {
            candidate_id,
            author,
            content,
        } => {
            let content = content.trim().to_string();
            let author = author.trim().to_string();
            if content.is_empty() || author.is_empty() || state.candidate(&candidate_id).is_none()
            {
                Vec::new()
            } else {
                state.note_started();
                state.mark_dirty();
                vec![Effect::AppendNote {
                    candidate_id,
                    author,
                    content,
                }]
            }
        }
        Msg::NoteSettled {
            candidate_id,
            result,
        } => {
            state.note_finished();
            state.mark_dirty();
            let name = state
                .candidate(&candidate_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| candidate_id.clone());
            match result {
                Ok(note) => {
                    if let Some(candidate) = state.candidate_mut(&candidate_id) {
                        candidate.notes.push(note);
                    }
                    state.push_toast(Toast::note_added(&name));
                }
                Err(message) => state.push_toast(Toast::note_failed(&name, &message)),
            }
            Vec::new()
        }
        Msg::CandidateSelected(candidate_id) => {
            state.select(candidate_id);
            Vec::new()
        }
        Msg::FilterChanged { search, stage } => {
            state.set_filter(search, stage);
            Vec::new()
        }
        Msg::PageChanged(page) => {
            state.set_page(page);
            Vec::new()
        }
        Msg::ToastDismissed(id) => {
            state.dismiss_toast(id);
            Vec::new()
        }
        Msg::Tick => {
            state.age_toasts();
            Vec::new()
        }
    };

    (state, effects)
}
