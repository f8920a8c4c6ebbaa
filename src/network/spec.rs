use serde::{Serialize, Deserialize};

use crate::activation::{ActivationFunction, ActivationRepr};
use crate::error::{NetworkError, Result};

/// A fully serializable description of a network's construction parameters.
///
/// Fields:
/// - `input_count`   — ordinary neurons in the input layer
/// - `hidden_layers` — ordinary neuron count of each hidden layer, in order
/// - `activations`   — one entry per layer, input layer through output layer
/// - `output_count`  — neurons in the output layer
/// - `has_bias`      — one entry per layer; `has_bias[l]` injects a bias
///                     neuron into layer `l - 1` feeding layer `l`.  The
///                     entry for the input layer is ignored.
/// - `learning_rate` — copied into every synapse
/// - `seed`          — optional seed used by `Network::from_spec`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_count: usize,
    #[serde(default)]
    pub hidden_layers: Vec<usize>,
    pub activations: Vec<ActivationFunction>,
    pub output_count: usize,
    pub has_bias: Vec<bool>,
    pub learning_rate: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkSpec {
    pub fn new(
        input_count: usize,
        hidden_layers: Vec<usize>,
        activations: Vec<ActivationFunction>,
        output_count: usize,
        has_bias: Vec<bool>,
        learning_rate: f64,
    ) -> NetworkSpec {
        NetworkSpec {
            input_count,
            hidden_layers,
            activations,
            output_count,
            has_bias,
            learning_rate,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> NetworkSpec {
        self.seed = Some(seed);
        self
    }

    /// Input, hidden and output layers.
    pub fn layer_count(&self) -> usize {
        self.hidden_layers.len() + 2
    }

    /// Ordinary neuron count per layer, input first.
    pub fn layer_widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.layer_count());
        widths.push(self.input_count);
        widths.extend_from_slice(&self.hidden_layers);
        widths.push(self.output_count);
        widths
    }

    pub fn validate(&self) -> Result<()> {
        let layers = self.layer_count();
        if self.activations.len() != layers {
            return Err(NetworkError::Configuration(format!(
                "expected {layers} activation functions (one per layer), got {}",
                self.activations.len()
            )));
        }
        if self.has_bias.len() != layers {
            return Err(NetworkError::Configuration(format!(
                "expected {layers} bias flags (one per layer), got {}",
                self.has_bias.len()
            )));
        }
        if let Some(layer) = self.layer_widths().iter().position(|&w| w == 0) {
            return Err(NetworkError::Configuration(format!("layer {layer} has no neurons")));
        }
        if let Some(layer) = self.activations.iter().position(|&a| a == ActivationFunction::Bias) {
            return Err(NetworkError::Configuration(format!(
                "layer {layer} uses the bias activation, which is reserved for injected bias neurons"
            )));
        }
        if !self.learning_rate.is_finite() {
            return Err(NetworkError::Configuration(format!(
                "learning rate must be finite, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a `NetworkSpec` from a JSON file.
    ///
    /// Activations may be written as names or numeric codes; one that names
    /// no variant is `InvalidActivationVariant` rather than a JSON error.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let raw: SpecFile = serde_json::from_reader(reader)?;
        let activations = raw.activations
            .into_iter()
            .map(ActivationFunction::try_from)
            .collect::<Result<Vec<_>>>()?;
        let spec = NetworkSpec {
            input_count: raw.input_count,
            hidden_layers: raw.hidden_layers,
            activations,
            output_count: raw.output_count,
            has_bias: raw.has_bias,
            learning_rate: raw.learning_rate,
            seed: raw.seed,
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// On-disk shape of a `NetworkSpec` before activations are resolved.
#[derive(Deserialize)]
struct SpecFile {
    input_count: usize,
    #[serde(default)]
    hidden_layers: Vec<usize>,
    activations: Vec<ActivationRepr>,
    output_count: usize,
    has_bias: Vec<bool>,
    learning_rate: f64,
    #[serde(default)]
    seed: Option<u64>,
}
