use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::Operation;

/// Decides whether a gateway call is turned into a simulated network error.
pub trait FaultPolicy: Send + Sync {
    fn should_fail(&self, operation: Operation) -> bool;
}

/// Independent failure probability per operation, in `0.0..=1.0`.
/// Reads never fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureRates {
    pub create_job: f64,
    pub update_job: f64,
    pub reorder_job: f64,
    pub create_candidate: f64,
    pub update_candidate: f64,
    pub add_note: f64,
    pub save_assessment: f64,
}

impl Default for FailureRates {
    fn default() -> Self {
        Self {
            create_job: 0.05,
            update_job: 0.05,
            reorder_job: 0.10,
            create_candidate: 0.05,
            update_candidate: 0.01,
            add_note: 0.0,
            save_assessment: 0.0,
        }
    }
}

impl FailureRates {
    pub fn none() -> Self {
        Self {
            create_job: 0.0,
            update_job: 0.0,
            reorder_job: 0.0,
            create_candidate: 0.0,
            update_candidate: 0.0,
            add_note: 0.0,
            save_assessment: 0.0,
        }
    }

    pub fn rate_for(&self, operation: Operation) -> f64 {
        let rate = match operation {
            Operation::CreateJob => self.create_job,
            Operation::UpdateJob => self.update_job,
            Operation::ReorderJob => self.reorder_job,
            Operation::CreateCandidate => self.create_candidate,
            Operation::UpdateCandidate => self.update_candidate,
            Operation::AddNote => self.add_note,
            Operation::SaveAssessment => self.save_assessment,
            Operation::ListJobs
            | Operation::GetJob
            | Operation::ListCandidates
            | Operation::GetCandidate
            | Operation::GetAssessment => 0.0,
        };
        if rate.is_finite() {
            rate.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Fails each call with an independent random draw.
#[derive(Debug)]
pub struct RandomFaultPolicy {
    rates: FailureRates,
    rng: Mutex<ChaCha8Rng>,
}

impl RandomFaultPolicy {
    /// Unseeded: draws come from OS entropy.
    pub fn new(rates: FailureRates) -> Self {
        Self {
            rates,
            rng: Mutex::new(ChaCha8Rng::from_os_rng()),
        }
    }

    pub fn seeded(rates: FailureRates, seed: u64) -> Self {
        Self {
            rates,
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn rates(&self) -> &FailureRates {
        &self.rates
    }
}

impl FaultPolicy for RandomFaultPolicy {
    fn should_fail(&self, operation: Operation) -> bool {
        let rate = self.rates.rate_for(operation);
        if rate <= 0.0 {
            return false;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_bool(rate)
    }
}

/// Never injects a failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverFail;

impl FaultPolicy for NeverFail {
    fn should_fail(&self, _operation: Operation) -> bool {
        false
    }
}

/// Replays a fixed list of verdicts for one operation; every other
/// operation, and calls past the end of the script, succeed.
#[derive(Debug)]
pub struct ScriptedFaultPolicy {
    operation: Operation,
    verdicts: Mutex<VecDeque<bool>>,
}

impl ScriptedFaultPolicy {
    pub fn new(operation: Operation, verdicts: impl IntoIterator<Item = bool>) -> Self {
        Self {
            operation,
            verdicts: Mutex::new(verdicts.into_iter().collect()),
        }
    }
}

impl FaultPolicy for ScriptedFaultPolicy {
    fn should_fail(&self, operation: Operation) -> bool {
        if operation != self.operation {
            return false;
        }
        self.verdicts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(false)
    }
}

/// Fails every call to one operation.
#[derive(Debug, Clone, Copy)]
pub struct AlwaysFail(pub Operation);

impl FaultPolicy for AlwaysFail {
    fn should_fail(&self, operation: Operation) -> bool {
        operation == self.0
    }
}
