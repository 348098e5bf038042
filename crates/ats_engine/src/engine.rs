use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use ats_core::{CandidateQuery, JobQuery};
use ats_logging::{ats_debug, ats_warn};

use crate::controller::{persist_reorder, persist_stage};
use crate::{EngineCommand, EngineEvent, MutationGateway, ReorderApi};

/// Runs gateway calls on a background tokio runtime. Commands go in through
/// [`EngineHandle::submit`]; results come back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(gateway: Arc<MutationGateway>, reorder_api: Arc<dyn ReorderApi>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("ats-engine".into())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let gateway = gateway.clone();
                    let reorder_api = reorder_api.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        let event =
                            handle_command(&gateway, reorder_api.as_ref(), command).await;
                        if event_tx.send(event).is_err() {
                            ats_debug!("engine event dropped; receiver closed");
                        }
                    });
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            ats_warn!("engine worker is gone; command dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    gateway: &MutationGateway,
    reorder_api: &dyn ReorderApi,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::LoadJobs => EngineEvent::JobsLoaded(
            gateway
                .list_jobs(&JobQuery::all())
                .await
                .map(|page| page.items)
                .map_err(|err| err.to_string()),
        ),
        EngineCommand::LoadCandidates => EngineEvent::CandidatesLoaded(
            gateway
                .list_candidates(&CandidateQuery::all())
                .await
                .map(|page| page.items)
                .map_err(|err| err.to_string()),
        ),
        EngineCommand::PersistStage {
            request_id,
            candidate_id,
            stage,
        } => EngineEvent::StageSettled {
            request_id,
            result: persist_stage(gateway, &candidate_id, stage)
                .await
                .map_err(|err| err.to_string()),
        },
        EngineCommand::PersistReorder {
            request_id,
            job_id,
            from_order,
            to_order,
        } => EngineEvent::ReorderSettled {
            request_id,
            result: persist_reorder(
                reorder_api,
                &job_id,
                from_order,
                to_order,
                gateway.settings().rollback_delay(),
            )
            .await,
        },
        EngineCommand::AppendNote {
            candidate_id,
            author,
            content,
        } => {
            let result = gateway
                .add_note(&candidate_id, &author, &content)
                .await
                .map_err(|err| err.to_string());
            EngineEvent::NoteSettled {
                candidate_id,
                result,
            }
        }
    }
}
