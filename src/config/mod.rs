pub mod traits;
pub mod search;
pub mod simulation;
pub mod manager;

pub use manager::{output_stem, ConfigManager, ExperimentConfig, ExperimentPaths};
pub use search::SearchConfig;
pub use simulation::SimulationConfig;
pub use traits::ConfigSection;
