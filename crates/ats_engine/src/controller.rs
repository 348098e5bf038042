//! Optimistic update controllers: apply a change to local state at once,
//! persist it through the gateway, then confirm or roll back.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ats_core::{
    adopt_stage_history, apply_stage_change, plan_reorder, Candidate, CandidatePatch,
    CandidateQuery, CandidateStage, Job, StageChange, Toast,
};
use ats_logging::{ats_error, ats_info, ats_warn};

use crate::{GatewayError, MutationGateway, ReorderApi, ReorderRequest};

#[derive(Debug, Default)]
struct Versioned<T> {
    version: u64,
    value: T,
}

/// A single-owner local copy of store entities. Every write bumps the version.
#[derive(Debug, Default)]
pub struct LocalCache<T> {
    inner: Mutex<Versioned<T>>,
}

impl<T: Clone> LocalCache<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Versioned { version: 0, value }),
        }
    }

    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    pub fn version(&self) -> u64 {
        self.lock().version
    }

    /// Replaces the value and returns the new version.
    pub fn set(&self, value: T) -> u64 {
        let mut guard = self.lock();
        guard.value = value;
        guard.version += 1;
        guard.version
    }

    /// Mutates in place; the version is bumped whether or not `f` changed anything.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        let result = f(&mut guard.value);
        guard.version += 1;
        result
    }

    fn lock(&self) -> MutexGuard<'_, Versioned<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Unknown candidate or already in the target stage; no request was sent.
    Skipped,
    /// Backend accepted the change; the cached candidate took the stored timeline.
    Confirmed { toast: Toast },
    /// Backend rejected the change; local state was replaced by a fresh fetch.
    Reconciled { message: String, toast: Toast },
}

/// Persists a stage change; the caller decides how to reconcile a failure.
pub async fn persist_stage(
    gateway: &MutationGateway,
    candidate_id: &str,
    stage: CandidateStage,
) -> Result<Candidate, GatewayError> {
    gateway
        .update_candidate(candidate_id, CandidatePatch::stage(stage))
        .await
}

/// Moves a candidate to `stage` with immediate local feedback.
///
/// The cache reflects the new stage before the gateway is called. On failure
/// the whole candidate collection is fetched again and replaces the cache.
/// Concurrent calls are not serialized: the last one to settle wins.
pub async fn change_candidate_stage(
    gateway: &MutationGateway,
    cache: &LocalCache<Vec<Candidate>>,
    candidate_id: &str,
    stage: CandidateStage,
) -> StageOutcome {
    let candidate_name = match cache.update(|list| apply_stage_change(list, candidate_id, stage)) {
        StageChange::Missing | StageChange::Unchanged => return StageOutcome::Skipped,
        StageChange::Moved { candidate_name, .. } => candidate_name,
    };

    match persist_stage(gateway, candidate_id, stage).await {
        Ok(stored) => {
            cache.update(|list| adopt_stage_history(list, &stored));
            StageOutcome::Confirmed {
                toast: Toast::stage_changed(&candidate_name, stage),
            }
        }
        Err(err) => {
            ats_warn!(
                "stage change for {} to {} failed: {}",
                candidate_id,
                stage,
                err
            );
            match gateway.list_candidates(&CandidateQuery::all()).await {
                Ok(page) => {
                    cache.set(page.items);
                }
                Err(reload_err) => {
                    ats_error!("candidate reload after failed stage change: {}", reload_err);
                }
            }
            StageOutcome::Reconciled {
                message: err.to_string(),
                toast: Toast::stage_change_failed(&candidate_name),
            }
        }
    }
}

/// Persists a reorder. A failure is reported only after `rollback_delay`.
pub async fn persist_reorder(
    api: &dyn ReorderApi,
    job_id: &str,
    from_order: u32,
    to_order: u32,
    rollback_delay: Duration,
) -> Result<(), String> {
    let request = ReorderRequest {
        from_order,
        to_order,
    };
    match api.reorder(job_id, request).await {
        Ok(()) => Ok(()),
        Err(err) => {
            ats_info!(
                "rolling back reorder of {} ({} -> {}): {}",
                job_id,
                from_order,
                to_order,
                err
            );
            if !rollback_delay.is_zero() {
                tokio::time::sleep(rollback_delay).await;
            }
            Err(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Nothing to move; no request was sent.
    Unchanged(Vec<Job>),
    /// Backend accepted the move.
    Persisted { jobs: Vec<Job>, toast: Toast },
    /// Backend rejected the move; `jobs` is the list from before the drag.
    RolledBack {
        jobs: Vec<Job>,
        message: String,
        toast: Toast,
    },
}

impl ReorderOutcome {
    pub fn jobs(&self) -> &[Job] {
        match self {
            ReorderOutcome::Unchanged(jobs)
            | ReorderOutcome::Persisted { jobs, .. }
            | ReorderOutcome::RolledBack { jobs, .. } => jobs,
        }
    }

    pub fn into_jobs(self) -> Vec<Job> {
        match self {
            ReorderOutcome::Unchanged(jobs)
            | ReorderOutcome::Persisted { jobs, .. }
            | ReorderOutcome::RolledBack { jobs, .. } => jobs,
        }
    }
}

/// Moves the job at `from_index` to `to_index` with immediate local feedback.
///
/// The cache holds the renumbered list while the request is in flight. On
/// failure the original list is restored, after the rollback delay.
pub async fn reorder_jobs(
    api: &dyn ReorderApi,
    cache: &LocalCache<Vec<Job>>,
    from_index: usize,
    to_index: usize,
    rollback_delay: Duration,
) -> ReorderOutcome {
    let original = cache.get();
    let Some(plan) = plan_reorder(&original, from_index, to_index) else {
        return ReorderOutcome::Unchanged(original);
    };
    cache.set(plan.jobs.clone());

    match persist_reorder(
        api,
        &plan.job_id,
        plan.from_order,
        plan.to_order,
        rollback_delay,
    )
    .await
    {
        Ok(()) => {
            let title = plan
                .jobs
                .iter()
                .find(|job| job.id == plan.job_id)
                .map(|job| job.title.as_str())
                .unwrap_or_default();
            ReorderOutcome::Persisted {
                toast: Toast::jobs_reordered(title),
                jobs: plan.jobs,
            }
        }
        Err(message) => {
            cache.set(original.clone());
            ReorderOutcome::RolledBack {
                toast: Toast::reorder_failed(&message),
                jobs: original,
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_versions_every_write() {
        let cache = LocalCache::new(vec![1, 2]);
        assert_eq!(cache.version(), 0);
        assert_eq!(cache.set(vec![3]), 1);
        let len = cache.update(|v| {
            v.push(4);
            v.len()
        });
        assert_eq!(len, 2);
        assert_eq!(cache.version(), 2);
        assert_eq!(cache.get(), vec![3, 4]);
    }
}
