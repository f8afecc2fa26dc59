// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod effects;
pub mod engine;
pub mod loader;
pub mod normalize;
pub mod puzzle;
pub mod runtime;
pub mod selection;
pub mod strings;
pub mod timer;
pub mod ui;
pub mod util;
pub mod validate;

pub use engine::{
    Callbacks, CompletionReason, Engine, EngineError, EngineObserver, GameState, Summary,
};
