//! Application Layer - Discovery, evaluation and the watch cycle

pub mod discovery;
pub mod evaluator;
pub mod orchestrator;

pub use discovery::Discovery;
pub use evaluator::Evaluator;
pub use orchestrator::{CycleReport, WatcherOrchestrator, WatcherSettings};
