use crate::{Job, JobId};

/// The optimistic outcome of dragging one job to a new list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub job_id: JobId,
    /// `order` of the moved job before the move.
    pub from_order: u32,
    /// `order` of the moved job after the move.
    pub to_order: u32,
    /// The list after the move, renumbered 1..N.
    pub jobs: Vec<Job>,
}

/// Moves the job at `from_index` to `to_index` (splice semantics, not a swap)
/// and renumbers every `order` to its new 1-based position.
///
/// Returns `None` when nothing moves: equal indices or an index out of range.
pub fn plan_reorder(jobs: &[Job], from_index: usize, to_index: usize) -> Option<ReorderPlan> {
    if from_index == to_index || from_index >= jobs.len() || to_index >= jobs.len() {
        return None;
    }

    let mut moved = jobs.to_vec();
    let job = moved.remove(from_index);
    let from_order = job.order;
    let job_id = job.id.clone();
    moved.insert(to_index, job);
    renumber(&mut moved);

    Some(ReorderPlan {
        job_id,
        from_order,
        to_order: moved[to_index].order,
        jobs: moved,
    })
}

/// Rewrites `order` as the 1-based array position.
pub fn renumber(jobs: &mut [Job]) {
    for (position, job) in jobs.iter_mut().enumerate() {
        job.order = position as u32 + 1;
    }
}

/// True when `order` runs exactly 1..=N in array order.
pub fn orders_are_dense(jobs: &[Job]) -> bool {
    jobs.iter()
        .enumerate()
        .all(|(position, job)| job.order == position as u32 + 1)
}
