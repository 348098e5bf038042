use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use ats_core::{
    Assessment, Candidate, CandidatePatch, CandidateQuery, Job, JobPatch, JobQuery, NewCandidate,
    NewJob, Note, Page,
};
use ats_logging::{ats_debug, ats_warn};
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{
    EntityStore, FailureRates, FaultPolicy, GatewayError, Operation, OperationClass,
    RandomFaultPolicy,
};

/// Inclusive latency window in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencyRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    fn sample(self, rng: &mut ChaCha8Rng) -> Duration {
        let (low, high) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        if low == high {
            return Duration::from_millis(low);
        }
        Duration::from_millis(rng.random_range(low..=high))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub read_latency: LatencyRange,
    pub write_latency: LatencyRange,
    pub reorder_latency: LatencyRange,
    /// Extra pause before a failed reorder is reported, so the revert is perceptible.
    pub rollback_delay_ms: u64,
    pub failure_rates: FailureRates,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            read_latency: LatencyRange::new(300, 800),
            write_latency: LatencyRange::new(500, 1500),
            reorder_latency: LatencyRange::new(300, 1000),
            rollback_delay_ms: 500,
            failure_rates: FailureRates::default(),
        }
    }
}

impl GatewaySettings {
    /// No latency and no rollback pause; failure rates unchanged.
    pub fn immediate() -> Self {
        Self {
            read_latency: LatencyRange::zero(),
            write_latency: LatencyRange::zero(),
            reorder_latency: LatencyRange::zero(),
            rollback_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn rollback_delay(&self) -> Duration {
        Duration::from_millis(self.rollback_delay_ms)
    }

    fn latency_for(&self, class: OperationClass) -> LatencyRange {
        match class {
            OperationClass::Read => self.read_latency,
            OperationClass::Write => self.write_latency,
            OperationClass::Reorder => self.reorder_latency,
        }
    }
}

/// Simulated network boundary in front of the [`EntityStore`]: every call
/// waits a random latency, then either fails as a network error (leaving the
/// store untouched) or delegates to the store.
pub struct MutationGateway {
    store: Arc<EntityStore>,
    faults: Arc<dyn FaultPolicy>,
    settings: GatewaySettings,
    jitter: Mutex<ChaCha8Rng>,
    calls: [AtomicU64; Operation::ALL.len()],
}

impl MutationGateway {
    /// Gateway with random, unseeded failure injection at the configured rates.
    pub fn new(store: Arc<EntityStore>, settings: GatewaySettings) -> Self {
        let faults = Arc::new(RandomFaultPolicy::new(settings.failure_rates.clone()));
        Self::with_fault_policy(store, settings, faults)
    }

    pub fn with_fault_policy(
        store: Arc<EntityStore>,
        settings: GatewaySettings,
        faults: Arc<dyn FaultPolicy>,
    ) -> Self {
        Self {
            store,
            faults,
            settings,
            jitter: Mutex::new(ChaCha8Rng::from_os_rng()),
            calls: Default::default(),
        }
    }

    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// How many times `operation` has been called, including injected failures.
    pub fn call_count(&self, operation: Operation) -> u64 {
        self.calls[operation.index()].load(Ordering::Relaxed)
    }

    pub async fn list_jobs(&self, query: &JobQuery) -> Result<Page<Job>, GatewayError> {
        self.enter(Operation::ListJobs).await?;
        Ok(self.store.list_jobs(query))
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job, GatewayError> {
        self.enter(Operation::GetJob).await?;
        Ok(self.store.get_job(job_id)?)
    }

    pub async fn create_job(&self, new_job: NewJob) -> Result<Job, GatewayError> {
        self.enter(Operation::CreateJob).await?;
        Ok(self.store.create_job(new_job))
    }

    pub async fn update_job(&self, job_id: &str, patch: JobPatch) -> Result<Job, GatewayError> {
        self.enter(Operation::UpdateJob).await?;
        Ok(self.store.update_job(job_id, patch)?)
    }

    pub async fn reorder_job(
        &self,
        job_id: &str,
        from_order: u32,
        to_order: u32,
    ) -> Result<(), GatewayError> {
        self.enter(Operation::ReorderJob).await?;
        Ok(self.store.reorder_job(job_id, from_order, to_order)?)
    }

    pub async fn list_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Page<Candidate>, GatewayError> {
        self.enter(Operation::ListCandidates).await?;
        Ok(self.store.list_candidates(query))
    }

    pub async fn get_candidate(&self, candidate_id: &str) -> Result<Candidate, GatewayError> {
        self.enter(Operation::GetCandidate).await?;
        Ok(self.store.get_candidate(candidate_id)?)
    }

    pub async fn create_candidate(
        &self,
        new_candidate: NewCandidate,
    ) -> Result<Candidate, GatewayError> {
        self.enter(Operation::CreateCandidate).await?;
        Ok(self.store.create_candidate(new_candidate)?)
    }

    pub async fn update_candidate(
        &self,
        candidate_id: &str,
        patch: CandidatePatch,
    ) -> Result<Candidate, GatewayError> {
        self.enter(Operation::UpdateCandidate).await?;
        Ok(self.store.update_candidate(candidate_id, patch)?)
    }

    pub async fn add_note(
        &self,
        candidate_id: &str,
        author: &str,
        content: &str,
    ) -> Result<Note, GatewayError> {
        self.enter(Operation::AddNote).await?;
        Ok(self.store.add_note(candidate_id, author, content)?)
    }

    pub async fn get_assessment(&self, job_id: &str) -> Result<Option<Assessment>, GatewayError> {
        self.enter(Operation::GetAssessment).await?;
        Ok(self.store.assessment_for_job(job_id))
    }

    pub async fn save_assessment(&self, assessment: Assessment) -> Result<Assessment, GatewayError> {
        self.enter(Operation::SaveAssessment).await?;
        Ok(self.store.save_assessment(assessment)?)
    }

    /// Counts the call, sleeps the simulated latency and rolls for failure.
    async fn enter(&self, operation: Operation) -> Result<(), GatewayError> {
        self.calls[operation.index()].fetch_add(1, Ordering::Relaxed);
        let delay = {
            let mut rng = self.jitter.lock().unwrap_or_else(PoisonError::into_inner);
            self.settings
                .latency_for(operation.class())
                .sample(&mut rng)
        };
        ats_debug!("gateway {} after {}ms", operation.action(), delay.as_millis());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.faults.should_fail(operation) {
            ats_warn!("gateway injected failure for {}", operation.action());
            return Err(GatewayError::Network(operation));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_sample_stays_in_window() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let range = LatencyRange::new(300, 800);
        for _ in 0..200 {
            let ms = range.sample(&mut rng).as_millis() as u64;
            assert!((300..=800).contains(&ms));
        }
        let swapped = LatencyRange::new(900, 100).sample(&mut rng);
        assert!(swapped >= Duration::from_millis(100) && swapped <= Duration::from_millis(900));
    }

    #[test]
    fn default_settings_match_simulated_network() {
        let settings = GatewaySettings::default();
        assert_eq!(settings.read_latency, LatencyRange::new(300, 800));
        assert_eq!(settings.write_latency, LatencyRange::new(500, 1500));
        assert_eq!(settings.reorder_latency, LatencyRange::new(300, 1000));
        assert_eq!(settings.rollback_delay(), Duration::from_millis(500));
    }
}
