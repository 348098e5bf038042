use crate::{Candidate, CandidateId, CandidateStage, Job, Note, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Authoritative job list arrived from the store.
    JobsLoaded(Vec<Job>),
    /// Authoritative candidate list arrived from the store.
    CandidatesLoaded(Vec<Candidate>),
    /// A load request failed; the previous local list stays.
    LoadFailed { what: String, message: String },
    /// User dropped a candidate card onto a kanban column.
    CandidateDropped {
        candidate_id: CandidateId,
        stage: CandidateStage,
    },
    /// Backend answered a stage change; `Ok` carries the stored record.
    StageChangeSettled {
        request_id: RequestId,
        result: Result<Candidate, String>,
    },
    /// User dragged a job row from one list position to another.
    JobDragged { from_index: usize, to_index: usize },
    /// Backend answered a reorder.
    JobReorderSettled {
        request_id: RequestId,
        result: Result<(), String>,
    },
    /// User submitted a note for a candidate.
    NoteSubmitted {
        candidate_id: CandidateId,
        author: String,
        content: String,
    },
    /// Backend answered a note append.
    NoteSettled {
        candidate_id: CandidateId,
        result: Result<Note, String>,
    },
    /// User opened (or closed) a candidate's detail panel.
    CandidateSelected(Option<CandidateId>),
    /// User changed the candidate list filter.
    FilterChanged {
        search: Option<String>,
        stage: Option<CandidateStage>,
    },
    /// User switched the candidate list page.
    PageChanged(usize),
    /// User closed a toast.
    ToastDismissed(u64),
    /// UI/render tick; ages toasts.
    Tick,
}
