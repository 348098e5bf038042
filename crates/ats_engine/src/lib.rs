//! ATS engine: entity store, simulated mutation gateway and the async
//! optimistic-update controllers.
mod controller;
mod engine;
mod fault;
mod gateway;
mod persist;
mod reorder_api;
mod seed;
mod store;
mod types;

pub use controller::{
    change_candidate_stage, persist_reorder, persist_stage, reorder_jobs, LocalCache,
    ReorderOutcome, StageOutcome,
};
pub use engine::EngineHandle;
pub use fault::{AlwaysFail, FailureRates, FaultPolicy, NeverFail, RandomFaultPolicy, ScriptedFaultPolicy};
pub use gateway::{GatewaySettings, LatencyRange, MutationGateway};
pub use persist::{
    ensure_output_dir, load_snapshot, save_snapshot, AtomicFileWriter, PersistError,
    STORE_FILENAME,
};
pub use reorder_api::{HttpReorderApi, ReorderApi, ReorderError, ReorderRequest, ReorderResponse};
pub use seed::{sample_assessment, seed_store, SeedSettings};
pub use store::{EntityStore, StoreSnapshot};
pub use types::{EngineCommand, EngineEvent, GatewayError, Operation, OperationClass, StoreError};
