use crate::{CandidateId, CandidateStage, JobId, RequestId};

/// Work the state machine asks the platform to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadJobs,
    LoadCandidates,
    PersistStage {
        request_id: RequestId,
        candidate_id: CandidateId,
        stage: CandidateStage,
    },
    PersistReorder {
        request_id: RequestId,
        job_id: JobId,
        from_order: u32,
        to_order: u32,
    },
    AppendNote {
        candidate_id: CandidateId,
        author: String,
        content: String,
    },
}
