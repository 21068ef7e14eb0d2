pub mod cli;
pub mod experiment_driver;

pub use cli::{ConverterArgs, DriverArgs};
pub use experiment_driver::{DriverState, ExperimentDriver};
