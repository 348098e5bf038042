use crate::{Candidate, CandidateStage};

/// Result of applying a stage drop to a local candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageChange {
    /// No candidate with that id is loaded.
    Missing,
    /// The candidate already sits in the target stage.
    Unchanged,
    /// The candidate moved; `previous` is the stage it left.
    Moved {
        previous: CandidateStage,
        candidate_name: String,
    },
}

/// Replaces the stage of `candidate_id` in place. All other fields and the
/// list order are untouched.
pub fn apply_stage_change(
    candidates: &mut [Candidate],
    candidate_id: &str,
    stage: CandidateStage,
) -> StageChange {
    let Some(candidate) = candidates.iter_mut().find(|c| c.id == candidate_id) else {
        return StageChange::Missing;
    };
    if candidate.stage == stage {
        return StageChange::Unchanged;
    }
    let previous = candidate.stage;
    candidate.stage = stage;
    StageChange::Moved {
        previous,
        candidate_name: candidate.name.clone(),
    }
}

/// Copies the stage history of a confirmed record onto the local candidate.
///
/// The local stage is kept so a newer in-flight drop keeps showing. Store
/// timelines only grow, so a shorter history from an older answer is ignored.
/// Returns whether anything was copied.
pub fn adopt_stage_history(candidates: &mut [Candidate], stored: &Candidate) -> bool {
    let Some(local) = candidates.iter_mut().find(|c| c.id == stored.id) else {
        return false;
    };
    if stored.timeline.len() < local.timeline.len() {
        return false;
    }
    local.timeline = stored.timeline.clone();
    local.updated_at = stored.updated_at;
    true
}

/// Number of loaded candidates per stage, in kanban column order.
pub fn stage_counts(candidates: &[Candidate]) -> [(CandidateStage, usize); 6] {
    CandidateStage::ALL.map(|stage| {
        let count = candidates.iter().filter(|c| c.stage == stage).count();
        (stage, count)
    })
}
