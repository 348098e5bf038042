use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of a candidate in the hiring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStage {
    Applied,
    Screen,
    Tech,
    Offer,
    Hired,
    Rejected,
}

impl CandidateStage {
    /// Kanban column order.
    pub const ALL: [CandidateStage; 6] = [
        CandidateStage::Applied,
        CandidateStage::Screen,
        CandidateStage::Tech,
        CandidateStage::Offer,
        CandidateStage::Hired,
        CandidateStage::Rejected,
    ];

    /// Wire name, as stored and sent to the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateStage::Applied => "applied",
            CandidateStage::Screen => "screen",
            CandidateStage::Tech => "tech",
            CandidateStage::Offer => "offer",
            CandidateStage::Hired => "hired",
            CandidateStage::Rejected => "rejected",
        }
    }

    /// Human-readable column title.
    pub fn label(self) -> &'static str {
        match self {
            CandidateStage::Applied => "Applied",
            CandidateStage::Screen => "Screening",
            CandidateStage::Tech => "Technical Interview",
            CandidateStage::Offer => "Offer",
            CandidateStage::Hired => "Hired",
            CandidateStage::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CandidateStage::Hired | CandidateStage::Rejected)
    }
}

impl fmt::Display for CandidateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown candidate stage {0:?}")]
pub struct ParseStageError(pub String);

impl FromStr for CandidateStage {
    type Err = ParseStageError;

    /// Accepts the wire name or the label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CandidateStage::ALL
            .into_iter()
            .find(|stage| {
                stage.as_str().eq_ignore_ascii_case(wanted)
                    || stage.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ParseStageError(s.to_string()))
    }
}
