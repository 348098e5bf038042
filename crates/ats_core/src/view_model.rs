use crate::notify::ToastLevel;
use crate::{CandidateStage, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// Kanban columns in pipeline order.
    pub columns: Vec<StageColumnView>,
    pub jobs: Vec<JobRowView>,
    pub list: CandidateListView,
    pub selected: Option<CandidateDetailView>,
    pub toasts: Vec<ToastView>,
    pub candidates_loaded: bool,
    pub pending_requests: usize,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn column(&self, stage: CandidateStage) -> Option<&StageColumnView> {
        self.columns.iter().find(|column| column.stage == stage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageColumnView {
    pub stage: CandidateStage,
    pub label: &'static str,
    pub cards: Vec<CandidateCardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCardView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub stage: CandidateStage,
    /// A stage change for this candidate is awaiting the backend.
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub id: String,
    pub title: String,
    pub order: u32,
    pub status: JobStatus,
    pub tags: Vec<String>,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateListView {
    pub search: Option<String>,
    pub stage: Option<CandidateStage>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub rows: Vec<CandidateCardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDetailView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub stage_label: &'static str,
    pub job_title: Option<String>,
    pub notes: Vec<NoteView>,
    pub timeline: Vec<TimelineEntryView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub author: String,
    pub content: String,
    pub mentions: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntryView {
    pub from: Option<&'static str>,
    pub to: &'static str,
    pub at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub id: u64,
    pub level: ToastLevel,
    pub title: String,
    pub description: String,
}
