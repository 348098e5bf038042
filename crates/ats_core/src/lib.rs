//! ATS core: domain model, pure optimistic-update helpers and the pipeline
//! board state machine.
mod assessment;
mod effect;
mod model;
mod msg;
mod notes;
mod notify;
mod pipeline;
mod query;
mod reorder;
mod slug;
mod stage;
mod state;
mod update;
mod view_model;

pub use assessment::{Assessment, Condition, Question, QuestionKind, Section};
pub use effect::Effect;
pub use model::{
    AssessmentId, Candidate, CandidateId, CandidatePatch, Job, JobId, JobPatch, JobStatus,
    NewCandidate, NewJob, Note, NoteId, SalaryRange, StageEvent,
};
pub use msg::Msg;
pub use notes::extract_mentions;
pub use notify::{Toast, ToastLevel, TOAST_TTL_TICKS};
pub use pipeline::{adopt_stage_history, apply_stage_change, stage_counts, StageChange};
pub use query::{paginate, CandidateQuery, JobQuery, Page, DEFAULT_PAGE_SIZE};
pub use reorder::{orders_are_dense, plan_reorder, renumber, ReorderPlan};
pub use slug::{slugify, unique_slug};
pub use stage::{CandidateStage, ParseStageError};
pub use state::{AppState, RequestId};
pub use update::update;
pub use view_model::{
    AppViewModel, CandidateCardView, CandidateDetailView, CandidateListView, JobRowView,
    NoteView, StageColumnView, TimelineEntryView, ToastView,
};
