use serde::{Serialize, Deserialize};

/// One synapse weight keyed by its position in the topology.
///
/// `source` indexes layer `layer` including its trailing bias neuron;
/// `destination` indexes the ordinary neurons of layer `layer + 1`.  A list
/// of these is everything an external store needs to rebuild a trained
/// network over a freshly constructed one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub layer: usize,
    pub source: usize,
    pub destination: usize,
    pub weight: f64,
}
