use crate::error::EvacError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), EvacError>;
}

/// Shorthand for the range checks every section performs.
pub(crate) fn ensure(condition: bool, section: &str, message: &str) -> Result<(), EvacError> {
    if condition {
        Ok(())
    } else {
        Err(EvacError::Configuration(format!("[{}] {}", section, message)))
    }
}
