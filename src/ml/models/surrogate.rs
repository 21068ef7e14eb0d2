use crate::error::{EvacError, Result};
use crate::types::FitnessValue;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MODEL_FORMAT: &str = "dense-mlp";
const MODEL_VERSION: u32 = 1;

/// Surrogate input: the raw gene values of a genome, sorted ascending.
///
/// The network was trained on placements presented in ascending order and
/// without rounding. This type can only be built from a genome, so a caller
/// cannot hand the model an unsorted or quantized vector by accident.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedFeatures(Vec<f64>);

impl SortedFeatures {
    pub fn from_genome(genome: &[f64]) -> Self {
        let mut values = genome.to_vec();
        values.sort_by(f64::total_cmp);
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Pretrained regression model approximating the simulated fitness.
///
/// Implementations are read-only after construction and shared by every
/// evaluation of an experiment.
pub trait SurrogateModel: Send + Sync {
    /// Number of features the model expects
    fn input_dim(&self) -> usize;

    fn predict(&self, features: &SortedFeatures) -> Result<FitnessValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Linear,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Linear => x,
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
        }
    }
}

/// Fully connected layer: `activation(weights * input + biases)`.
/// `weights` holds one row per output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                let z: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias;
                self.activation.apply(z)
            })
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelFile {
    format: String,
    version: u32,
    input_dim: usize,
    layers: Vec<DenseLayer>,
}

/// Feed-forward regression network loaded from its JSON export.
#[derive(Debug, Clone)]
pub struct MlpSurrogate {
    input_dim: usize,
    layers: Vec<DenseLayer>,
}

impl MlpSurrogate {
    /// Build a network, checking that the layers chain from `input_dim`
    /// features down to a single output.
    pub fn new(input_dim: usize, layers: Vec<DenseLayer>) -> Result<Self> {
        if input_dim == 0 {
            return Err(EvacError::ModelLoad("Input dimension must be positive".to_string()));
        }
        if layers.is_empty() {
            return Err(EvacError::ModelLoad("Model has no layers".to_string()));
        }

        let mut width = input_dim;
        for (i, layer) in layers.iter().enumerate() {
            if layer.weights.is_empty() {
                return Err(EvacError::ModelLoad(format!("Layer {} has no units", i)));
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != width) {
                return Err(EvacError::ModelLoad(format!(
                    "Layer {} expects {} inputs, got a row of {}",
                    i,
                    width,
                    row.len()
                )));
            }
            if layer.biases.len() != layer.weights.len() {
                return Err(EvacError::ModelLoad(format!(
                    "Layer {} has {} units but {} biases",
                    i,
                    layer.weights.len(),
                    layer.biases.len()
                )));
            }
            let finite = layer.weights.iter().flatten().chain(&layer.biases).all(|v| v.is_finite());
            if !finite {
                return Err(EvacError::ModelLoad(format!("Layer {} has non-finite parameters", i)));
            }
            width = layer.weights.len();
        }

        if width != 1 {
            return Err(EvacError::ModelLoad(format!(
                "Model must produce a single output, produces {}",
                width
            )));
        }

        Ok(Self { input_dim, layers })
    }

    /// Load a model exported for `expected_inputs` exits.
    pub fn load<P: AsRef<Path>>(path: P, expected_inputs: usize) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EvacError::ModelLoad(format!("Failed to read model {}: {}", path.display(), e))
        })?;

        let file: ModelFile = serde_json::from_str(&contents).map_err(|e| {
            EvacError::ModelLoad(format!("Failed to parse model {}: {}", path.display(), e))
        })?;

        if file.format != MODEL_FORMAT || file.version != MODEL_VERSION {
            return Err(EvacError::ModelLoad(format!(
                "Unsupported model format {} v{} (expected {} v{})",
                file.format, file.version, MODEL_FORMAT, MODEL_VERSION
            )));
        }
        if file.input_dim != expected_inputs {
            return Err(EvacError::ModelLoad(format!(
                "Model takes {} inputs but the problem has {} exits",
                file.input_dim, expected_inputs
            )));
        }

        let model = Self::new(file.input_dim, file.layers)?;
        log::info!(
            "Loaded surrogate model {} ({} layers, {} inputs)",
            path.display(),
            model.layers.len(),
            model.input_dim
        );
        Ok(model)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = ModelFile {
            format: MODEL_FORMAT.to_string(),
            version: MODEL_VERSION,
            input_dim: self.input_dim,
            layers: self.layers.clone(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

impl SurrogateModel for MlpSurrogate {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict(&self, features: &SortedFeatures) -> Result<FitnessValue> {
        if features.len() != self.input_dim {
            return Err(EvacError::Evaluation(format!(
                "Surrogate expects {} features, got {}",
                self.input_dim,
                features.len()
            )));
        }

        let output = self
            .layers
            .iter()
            .fold(features.as_slice().to_vec(), |activations, layer| layer.forward(&activations));

        match output.first() {
            Some(&value) if value.is_finite() => Ok(value),
            Some(&value) => Err(EvacError::Evaluation(format!(
                "Surrogate produced a non-finite prediction: {}",
                value
            ))),
            None => Err(EvacError::Evaluation("Surrogate produced no output".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// y = 2 * x0 + 3 * x1 + 1
    fn linear_model() -> MlpSurrogate {
        MlpSurrogate::new(
            2,
            vec![DenseLayer {
                weights: vec![vec![2.0, 3.0]],
                biases: vec![1.0],
                activation: Activation::Linear,
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_features_are_sorted_raw_values() {
        let features = SortedFeatures::from_genome(&[0.734, 0.1234, 0.5]);
        assert_eq!(features.as_slice(), &[0.1234, 0.5, 0.734]);
    }

    #[test]
    fn test_predict_linear() {
        let model = linear_model();
        let features = SortedFeatures::from_genome(&[0.5, 0.25]);
        // sorted: [0.25, 0.5] -> 0.5 + 1.5 + 1
        assert_eq!(model.predict(&features).unwrap(), 3.0);
    }

    #[test]
    fn test_hidden_relu_layer() {
        let model = MlpSurrogate::new(
            1,
            vec![
                DenseLayer {
                    weights: vec![vec![1.0], vec![-1.0]],
                    biases: vec![0.0, 0.0],
                    activation: Activation::Relu,
                },
                DenseLayer {
                    weights: vec![vec![1.0, 1.0]],
                    biases: vec![0.0],
                    activation: Activation::Linear,
                },
            ],
        )
        .unwrap();
        let features = SortedFeatures::from_genome(&[0.75]);
        assert_eq!(model.predict(&features).unwrap(), 0.75);
    }

    #[test]
    fn test_shape_mismatch_is_evaluation_error() {
        let model = linear_model();
        let features = SortedFeatures::from_genome(&[0.5]);
        assert!(matches!(model.predict(&features), Err(EvacError::Evaluation(_))));
    }

    #[test]
    fn test_rejects_inconsistent_layers() {
        let result = MlpSurrogate::new(
            3,
            vec![DenseLayer {
                weights: vec![vec![1.0, 1.0]],
                biases: vec![0.0],
                activation: Activation::Linear,
            }],
        );
        assert!(matches!(result, Err(EvacError::ModelLoad(_))));

        let result = MlpSurrogate::new(
            1,
            vec![DenseLayer {
                weights: vec![vec![1.0], vec![1.0]],
                biases: vec![0.0, 0.0],
                activation: Activation::Linear,
            }],
        );
        assert!(matches!(result, Err(EvacError::ModelLoad(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        linear_model().save(&path).unwrap();

        let loaded = MlpSurrogate::load(&path, 2).unwrap();
        assert_eq!(loaded.input_dim(), 2);
        assert!(matches!(MlpSurrogate::load(&path, 3), Err(EvacError::ModelLoad(_))));
    }

    #[test]
    fn test_load_missing_or_foreign_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            MlpSurrogate::load(dir.path().join("missing.json"), 2),
            Err(EvacError::ModelLoad(_))
        ));

        let path = dir.path().join("keras.json");
        std::fs::write(&path, r#"{"format": "keras-h5", "version": 2, "input_dim": 2, "layers": []}"#)
            .unwrap();
        assert!(matches!(MlpSurrogate::load(&path, 2), Err(EvacError::ModelLoad(_))));
    }
}
