use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use ats_core::{update, AppState, Effect, Msg};
use ats_engine::{
    EngineHandle, HttpReorderApi, MutationGateway, RandomFaultPolicy, ReorderApi,
};
use ats_logging::{ats_info, ats_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::persistence::{open_store, save_store};
use super::ui::commands::{self, Command, HELP};
use super::ui::render;

/// How long the main loop waits for input before checking engine events.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

enum Input {
    Line(String),
    Tick,
    Closed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;
    if !ats_logging::initialize(&config.log.destination(), config.log.level_filter()) {
        eprintln!("Warning: logging could not be initialized");
    }
    ats_info!("Starting with data dir {:?}", config.data_dir);

    let store = Arc::new(open_store(&config.data_dir, config.seed, &config.seed_data));
    let gateway = Arc::new(match config.seed {
        Some(seed) => MutationGateway::with_fault_policy(
            store.clone(),
            config.gateway.clone(),
            Arc::new(RandomFaultPolicy::seeded(
                config.gateway.failure_rates.clone(),
                seed,
            )),
        ),
        None => MutationGateway::new(store.clone(), config.gateway.clone()),
    });
    let reorder_api: Arc<dyn ReorderApi> = match &config.reorder_endpoint {
        Some(url) => {
            ats_warn!(
                "Reordering through {}; job order saved in {:?} will not follow it",
                url,
                config.data_dir
            );
            Arc::new(HttpReorderApi::new(url.as_str()))
        }
        None => gateway.clone(),
    };
    let engine = EngineHandle::new(gateway, reorder_api).context("starting engine")?;

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    spawn_stdin_reader(input_tx.clone());
    spawn_ticker(input_tx, Duration::from_millis(config.tick_ms.max(1)));

    let mut session = Session::new(EffectRunner::new(engine));
    session.run_effects(vec![Effect::LoadJobs, Effect::LoadCandidates]);
    println!("{HELP}");
    prompt();

    loop {
        match input_rx.recv_timeout(POLL_INTERVAL) {
            Ok(Input::Line(line)) => {
                if session.handle_line(&line) == Flow::Quit {
                    break;
                }
                prompt();
            }
            Ok(Input::Tick) => session.dispatch(Msg::Tick),
            Ok(Input::Closed) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
        session.pump_engine();
    }

    save_store(&config.data_dir, &store);
    ats_info!("Shutting down");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Owns the state machine; every message goes through [`Session::dispatch`].
struct Session {
    state: AppState,
    runner: EffectRunner,
    /// Highest toast id already printed.
    shown_toast: Option<u64>,
}

impl Session {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            shown_toast: None,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.run_effects(effects);
        if was_dirty {
            self.print_new_toasts();
        }
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        if !effects.is_empty() {
            self.runner.run(effects);
        }
    }

    fn pump_engine(&mut self) {
        for msg in self.runner.drain() {
            self.dispatch(msg);
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let command = match commands::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(err) => {
                println!("{err}");
                return Flow::Continue;
            }
        };
        for msg in command.messages() {
            self.dispatch(msg);
        }

        let view = self.state.view();
        match command {
            Command::Board | Command::Move { .. } => print!("{}", render::render_board(&view)),
            Command::Jobs | Command::Reorder { .. } => print!("{}", render::render_jobs(&view)),
            Command::List { .. } | Command::Page(_) => print!("{}", render::render_list(&view)),
            Command::Show(id) => {
                if view.selected.is_none() {
                    println!("No candidate {id}.");
                } else {
                    print!("{}", render::render_detail(view.selected.as_ref()));
                }
            }
            Command::Note { .. } | Command::Close | Command::Dismiss(_) => {}
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn print_new_toasts(&mut self) {
        let view = self.state.view();
        for toast in &view.toasts {
            if self.shown_toast.is_some_and(|shown| toast.id <= shown) {
                continue;
            }
            println!("{}", render::render_toast(toast));
            self.shown_toast = Some(toast.id);
        }
    }
}

fn prompt() {
    print!("ats> ");
    let _ = io::stdout().flush();
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if input_tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    ats_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        let _ = input_tx.send(Input::Closed);
    });
}

fn spawn_ticker(input_tx: mpsc::Sender<Input>, interval: Duration) {
    thread::spawn(move || {
        while input_tx.send(Input::Tick).is_ok() {
            thread::sleep(interval);
        }
    });
}
