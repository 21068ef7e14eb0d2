pub mod operators;
pub mod evolution_engine;
pub mod progress;

pub use evolution_engine::{
    EvolutionConfig, EvolutionEngine, ProgressCallback, SearchOutcome, SearchStrategy,
};
pub use progress::{ConsoleProgressCallback, SilentProgress};
