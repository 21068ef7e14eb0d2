pub mod cache;
pub mod connectors;
pub mod export;

pub use cache::FitnessCache;
pub use connectors::CsvConnector;
pub use export::{read_training_data, training_data_json};
