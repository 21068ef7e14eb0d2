pub mod canonical;
pub mod objective;

pub use canonical::{canonicalize, CanonicalKey, DEFAULT_PRECISION_STEP};
pub use objective::{EvaluationStats, ObjectiveFunction, PerimetralExitObjective};
