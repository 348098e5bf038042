use std::fmt;

use ats_core::{Candidate, CandidateId, CandidateStage, Job, JobId, Note, RequestId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every call the gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    ListJobs,
    GetJob,
    CreateJob,
    UpdateJob,
    ReorderJob,
    ListCandidates,
    GetCandidate,
    CreateCandidate,
    UpdateCandidate,
    AddNote,
    GetAssessment,
    SaveAssessment,
}

/// Latency bucket an operation falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    Read,
    Write,
    Reorder,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::ListJobs,
        Operation::GetJob,
        Operation::CreateJob,
        Operation::UpdateJob,
        Operation::ReorderJob,
        Operation::ListCandidates,
        Operation::GetCandidate,
        Operation::CreateCandidate,
        Operation::UpdateCandidate,
        Operation::AddNote,
        Operation::GetAssessment,
        Operation::SaveAssessment,
    ];

    pub fn class(self) -> OperationClass {
        match self {
            Operation::ListJobs
            | Operation::GetJob
            | Operation::ListCandidates
            | Operation::GetCandidate
            | Operation::GetAssessment => OperationClass::Read,
            Operation::ReorderJob => OperationClass::Reorder,
            Operation::CreateJob
            | Operation::UpdateJob
            | Operation::CreateCandidate
            | Operation::UpdateCandidate
            | Operation::AddNote
            | Operation::SaveAssessment => OperationClass::Write,
        }
    }

    /// Verb phrase used in user-facing failure messages.
    pub fn action(self) -> &'static str {
        match self {
            Operation::ListJobs => "load jobs",
            Operation::GetJob => "load job",
            Operation::CreateJob => "create job",
            Operation::UpdateJob => "update job",
            Operation::ReorderJob => "reorder job",
            Operation::ListCandidates => "load candidates",
            Operation::GetCandidate => "load candidate",
            Operation::CreateCandidate => "create candidate",
            Operation::UpdateCandidate => "update candidate",
            Operation::AddNote => "add note",
            Operation::GetAssessment => "load assessment",
            Operation::SaveAssessment => "save assessment",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("order {order} is outside 1..={len}")]
    InvalidOrder { order: u32, len: usize },
    #[error("job {job_id} is at order {actual}, not {expected}")]
    OrderMismatch {
        job_id: String,
        expected: u32,
        actual: u32,
    },
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Injected transient failure; nothing was applied.
    #[error("Network error: Failed to {}", .0.action())]
    Network(Operation),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Store(StoreError::NotFound { .. }))
    }
}

/// Work accepted by the engine worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
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

/// Results reported back by the engine worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobsLoaded(Result<Vec<Job>, String>),
    CandidatesLoaded(Result<Vec<Candidate>, String>),
    StageSettled {
        request_id: RequestId,
        result: Result<Candidate, String>,
    },
    ReorderSettled {
        request_id: RequestId,
        result: Result<(), String>,
    },
    NoteSettled {
        candidate_id: CandidateId,
        result: Result<Note, String>,
    },
}
