pub mod config;
pub mod data;
pub mod engines;
pub mod environment;
pub mod error;
pub mod ml;
pub mod services;
pub mod types;
