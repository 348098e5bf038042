use ats_core::{Effect, Msg};
use ats_engine::{EngineCommand, EngineEvent, EngineHandle};
use ats_logging::{ats_debug, ats_warn};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            ats_debug!("effect {:?}", effect);
            self.engine.submit(command_for(effect));
        }
    }

    /// Every engine event that has arrived so far, as messages.
    pub fn drain(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(msg_for)
            .collect()
    }
}

pub(crate) fn command_for(effect: Effect) -> EngineCommand {
    match effect {
        Effect::LoadJobs => EngineCommand::LoadJobs,
        Effect::LoadCandidates => EngineCommand::LoadCandidates,
        Effect::PersistStage {
            request_id,
            candidate_id,
            stage,
        } => EngineCommand::PersistStage {
            request_id,
            candidate_id,
            stage,
        },
        Effect::PersistReorder {
            request_id,
            job_id,
            from_order,
            to_order,
        } => EngineCommand::PersistReorder {
            request_id,
            job_id,
            from_order,
            to_order,
        },
        Effect::AppendNote {
            candidate_id,
            author,
            content,
        } => EngineCommand::AppendNote {
            candidate_id,
            author,
            content,
        },
    }
}

pub(crate) fn msg_for(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobsLoaded(Ok(jobs)) => Msg::JobsLoaded(jobs),
        EngineEvent::JobsLoaded(Err(message)) => load_failed("jobs", message),
        EngineEvent::CandidatesLoaded(Ok(candidates)) => Msg::CandidatesLoaded(candidates),
        EngineEvent::CandidatesLoaded(Err(message)) => load_failed("candidates", message),
        EngineEvent::StageSettled { request_id, result } => {
            Msg::StageChangeSettled { request_id, result }
        }
        EngineEvent::ReorderSettled { request_id, result } => {
            Msg::JobReorderSettled { request_id, result }
        }
        EngineEvent::NoteSettled {
            candidate_id,
            result,
        } => Msg::NoteSettled {
            candidate_id,
            result,
        },
    }
}

fn load_failed(what: &str, message: String) -> Msg {
    ats_warn!("loading {} failed: {}", what, message);
    Msg::LoadFailed {
        what: what.to_string(),
        message,
    }
}
