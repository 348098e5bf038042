use std::collections::BTreeMap;

use crate::notify::{ActiveToast, Toast, TOAST_TTL_TICKS};
use crate::view_model::{
    AppViewModel, CandidateCardView, CandidateDetailView, CandidateListView, JobRowView,
    NoteView, StageColumnView, TimelineEntryView, ToastView,
};
use crate::{
    adopt_stage_history, paginate, Candidate, CandidateId, CandidateQuery, CandidateStage, Job,
    JobId,
};

pub type RequestId = u64;

/// A stage change whose backend answer is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingStage {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub stage: CandidateStage,
}

/// A reorder whose backend answer is outstanding, with the list to restore on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingReorder {
    pub job_id: JobId,
    pub title: String,
    pub snapshot: Vec<Job>,
}

/// Local view of the pipeline. Diverges from the store while optimistic
/// changes are in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    jobs: Vec<Job>,
    candidates: Vec<Candidate>,
    candidates_loaded: bool,
    next_request_id: RequestId,
    pending_stages: BTreeMap<RequestId, PendingStage>,
    pending_reorders: BTreeMap<RequestId, PendingReorder>,
    pending_notes: usize,
    toasts: Vec<ActiveToast>,
    next_toast_id: u64,
    filter: CandidateQuery,
    selected: Option<CandidateId>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == candidate_id)
    }

    pub fn pending_requests(&self) -> usize {
        self.pending_stages.len() + self.pending_reorders.len() + self.pending_notes
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().map(|active| &active.toast)
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn candidates_mut(&mut self) -> &mut [Candidate] {
        &mut self.candidates
    }

    pub(crate) fn candidate_mut(&mut self, candidate_id: &str) -> Option<&mut Candidate> {
        self.candidates.iter_mut().find(|c| c.id == candidate_id)
    }

    pub(crate) fn confirm_stage_history(&mut self, stored: &Candidate) {
        if adopt_stage_history(&mut self.candidates, stored) {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
        self.mark_dirty();
    }

    pub(crate) fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.candidates_loaded = true;
        if let Some(selected) = &self.selected {
            if !self.candidates.iter().any(|c| &c.id == selected) {
                self.selected = None;
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.next_request_id += 1;
        self.next_request_id
    }

    pub(crate) fn track_stage(&mut self, request_id: RequestId, pending: PendingStage) {
        self.pending_stages.insert(request_id, pending);
    }

    pub(crate) fn take_stage(&mut self, request_id: RequestId) -> Option<PendingStage> {
        self.pending_stages.remove(&request_id)
    }

    pub(crate) fn track_reorder(&mut self, request_id: RequestId, pending: PendingReorder) {
        self.pending_reorders.insert(request_id, pending);
    }

    pub(crate) fn take_reorder(&mut self, request_id: RequestId) -> Option<PendingReorder> {
        self.pending_reorders.remove(&request_id)
    }

    pub(crate) fn note_started(&mut self) {
        self.pending_notes += 1;
    }

    pub(crate) fn note_finished(&mut self) {
        self.pending_notes = self.pending_notes.saturating_sub(1);
    }

    pub(crate) fn push_toast(&mut self, toast: Toast) {
        self.next_toast_id += 1;
        self.toasts.push(ActiveToast {
            id: self.next_toast_id,
            toast,
            remaining_ticks: TOAST_TTL_TICKS,
        });
        self.mark_dirty();
    }

    pub(crate) fn dismiss_toast(&mut self, id: u64) {
        let before = self.toasts.len();
        self.toasts.retain(|active| active.id != id);
        if self.toasts.len() != before {
            self.mark_dirty();
        }
    }

    pub(crate) fn age_toasts(&mut self) {
        let before = self.toasts.len();
        for active in &mut self.toasts {
            active.remaining_ticks = active.remaining_ticks.saturating_sub(1);
        }
        self.toasts.retain(|active| active.remaining_ticks > 0);
        if self.toasts.len() != before {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_filter(&mut self, search: Option<String>, stage: Option<CandidateStage>) {
        let search = search.filter(|s| !s.trim().is_empty());
        if self.filter.search != search || self.filter.stage != stage || self.filter.page != 1 {
            self.filter.search = search;
            self.filter.stage = stage;
            self.filter.page = 1;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_page(&mut self, page: usize) {
        let page = page.max(1);
        if self.filter.page != page {
            self.filter.page = page;
            self.mark_dirty();
        }
    }

    pub(crate) fn select(&mut self, candidate_id: Option<CandidateId>) {
        let candidate_id = candidate_id.filter(|id| self.candidate(id).is_some());
        if self.selected != candidate_id {
            self.selected = candidate_id;
            self.mark_dirty();
        }
    }

    pub fn view(&self) -> AppViewModel {
        let pending_candidates: Vec<&str> = self
            .pending_stages
            .values()
            .map(|p| p.candidate_id.as_str())
            .collect();
        let pending_jobs: Vec<&str> = self
            .pending_reorders
            .values()
            .map(|p| p.job_id.as_str())
            .collect();

        let card = |candidate: &Candidate| CandidateCardView {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            stage: candidate.stage,
            pending: pending_candidates.contains(&candidate.id.as_str()),
        };

        let columns = CandidateStage::ALL
            .into_iter()
            .map(|stage| StageColumnView {
                stage,
                label: stage.label(),
                cards: self
                    .candidates
                    .iter()
                    .filter(|c| c.stage == stage)
                    .map(card)
                    .collect(),
            })
            .collect();

        let jobs = self
            .jobs
            .iter()
            .map(|job| JobRowView {
                id: job.id.clone(),
                title: job.title.clone(),
                order: job.order,
                status: job.status,
                tags: job.tags.iter().cloned().collect(),
                pending: pending_jobs.contains(&job.id.as_str()),
            })
            .collect();

        let filtered: Vec<CandidateCardView> = self
            .candidates
            .iter()
            .filter(|c| self.filter.matches(c))
            .map(card)
            .collect();
        let page = paginate(filtered, self.filter.page, self.filter.page_size);
        let total_pages = page.total_pages();
        let list = CandidateListView {
            search: self.filter.search.clone(),
            stage: self.filter.stage,
            page: page.page,
            total_pages,
            total: page.total,
            rows: page.items,
        };

        let selected = self
            .selected
            .as_deref()
            .and_then(|id| self.candidate(id))
            .map(|candidate| CandidateDetailView {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                email: candidate.email.clone(),
                phone: candidate.phone.clone(),
                stage_label: candidate.stage.label(),
                job_title: self
                    .jobs
                    .iter()
                    .find(|job| job.id == candidate.job_id)
                    .map(|job| job.title.clone()),
                notes: candidate
                    .notes
                    .iter()
                    .map(|note| NoteView {
                        author: note.author.clone(),
                        content: note.content.clone(),
                        mentions: note.mentions.iter().cloned().collect(),
                        created_at: note.created_at.to_rfc3339(),
                    })
                    .collect(),
                timeline: candidate
                    .timeline
                    .iter()
                    .map(|event| TimelineEntryView {
                        from: event.from.map(CandidateStage::label),
                        to: event.to.label(),
                        at: event.at.to_rfc3339(),
                    })
                    .collect(),
            });

        AppViewModel {
            columns,
            jobs,
            list,
            selected,
            toasts: self
                .toasts
                .iter()
                .map(|active| ToastView {
                    id: active.id,
                    level: active.toast.level,
                    title: active.toast.title.clone(),
                    description: active.toast.description.clone(),
                })
                .collect(),
            candidates_loaded: self.candidates_loaded,
            pending_requests: self.pending_requests(),
            dirty: self.dirty,
        }
    }
}
