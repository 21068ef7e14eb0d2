pub mod diversity;
pub mod engine;

pub use diversity::CircularSetDiversity;
pub use engine::{ExperimentSummary, GenerationStats, RunSummary, StatisticsEngine};
