use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};
use crate::network::neuron::{Neuron, NeuronId};

/// Index of a synapse in the network's synapse arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SynapseId(pub usize);

/// Directed weighted edge.  Endpoints are arena handles, not references.
///
/// The per-epoch gradient samples are kept as a running sum and count; the
/// update only ever needs their mean.
#[derive(Debug, Clone)]
pub struct Synapse {
    source: NeuronId,
    destination: NeuronId,
    weight: f64,
    learning_rate: f64,
    gradient_sum: f64,
    gradient_count: usize,
}

impl Synapse {
    pub fn new(source: NeuronId, destination: NeuronId, weight: f64, learning_rate: f64) -> Synapse {
        Synapse {
            source,
            destination,
            weight,
            learning_rate,
            gradient_sum: 0.0,
            gradient_count: 0,
        }
    }

    pub fn source(&self) -> NeuronId {
        self.source
    }

    pub fn destination(&self) -> NeuronId {
        self.destination
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn pending_samples(&self) -> usize {
        self.gradient_count
    }

    pub(crate) fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Pushes `source.output * weight` into the destination's accumulator.
    pub fn activate(&self, neurons: &mut [Neuron]) {
        let contribution = neurons[self.source.0].output() * self.weight;
        neurons[self.destination.0].add_input(contribution);
    }

    /// Records one example's gradient: `destination.delta * source.output`.
    pub fn accumulate_gradient(&mut self, neurons: &[Neuron]) {
        let sample = neurons[self.destination.0].backprop_delta() * neurons[self.source.0].output();
        self.gradient_sum += sample;
        self.gradient_count += 1;
    }

    pub fn clear_gradient(&mut self) {
        self.gradient_sum = 0.0;
        self.gradient_count = 0;
    }

    /// `weight -= learning_rate * mean(samples)`, then clears the samples.
    pub fn apply_epoch_update(&mut self) -> Result<()> {
        if self.gradient_count == 0 {
            return Err(NetworkError::EmptyDataset);
        }
        let mean = self.gradient_sum / self.gradient_count as f64;
        self.weight -= self.learning_rate * mean;
        self.clear_gradient();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use approx::assert_relative_eq;

    fn pair() -> Vec<Neuron> {
        vec![
            Neuron::new(ActivationFunction::Identity),
            Neuron::new(ActivationFunction::Identity),
        ]
    }

    #[test]
    fn activate_adds_weighted_output() {
        let mut neurons = pair();
        neurons[0].set_input(2.0);
        neurons[0].update();
        neurons[1].set_input(1.0);
        let synapse = Synapse::new(NeuronId(0), NeuronId(1), 0.5, 0.1);
        synapse.activate(&mut neurons);
        assert_eq!(neurons[1].input(), 2.0);
    }

    #[test]
    fn epoch_update_uses_mean() {
        let mut neurons = pair();
        let mut synapse = Synapse::new(NeuronId(0), NeuronId(1), 1.0, 0.5);
        for (out, delta) in [(1.0, 2.0), (3.0, -1.0)] {
            neurons[0].set_input(out);
            neurons[0].update();
            neurons[1].set_backprop_delta(delta);
            synapse.accumulate_gradient(&neurons);
        }
        assert_eq!(synapse.pending_samples(), 2);
        // samples 2.0 and -3.0, mean -0.5
        synapse.apply_epoch_update().unwrap();
        assert_relative_eq!(synapse.weight(), 1.25);
        assert_eq!(synapse.pending_samples(), 0);
    }

    #[test]
    fn empty_epoch_is_rejected() {
        let mut synapse = Synapse::new(NeuronId(0), NeuronId(1), 0.3, 0.1);
        assert!(matches!(synapse.apply_epoch_update(), Err(NetworkError::EmptyDataset)));
        assert_eq!(synapse.weight(), 0.3);
    }
}
