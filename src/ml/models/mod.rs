pub mod surrogate;

pub use surrogate::{Activation, DenseLayer, MlpSurrogate, SortedFeatures, SurrogateModel};
