// Library surface for the binary, headless runs and integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod logging;
pub mod runtime;
pub mod scheduler;
pub mod sequence;
pub mod session;
pub mod symbol;
pub mod ui;

pub use engine::{EngineState, InputResult, SequenceMemoryEngine};
pub use error::ConfigError;
pub use events::{GameEvent, GameObserver};
