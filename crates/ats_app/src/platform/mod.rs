//! Terminal driver: wires stdin, the core state machine and the engine.
mod app;
mod config;
mod effects;
mod persistence;
mod ui;

pub use app::run_app;
