use crate::network::neuron::NeuronId;

/// One layer of the network: handles into the neuron arena.
///
/// The ordinary neurons come first; a bias neuron, when the next layer
/// asked for one, is always the last entry.
#[derive(Debug, Clone)]
pub struct Layer {
    neurons: Vec<NeuronId>,
    width: usize,
}

impl Layer {
    pub fn new(neurons: Vec<NeuronId>) -> Layer {
        let width = neurons.len();
        Layer { neurons, width }
    }

    /// Number of ordinary (non-bias) neurons.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Every neuron in order, the bias neuron included.
    pub fn neurons(&self) -> &[NeuronId] {
        &self.neurons
    }

    pub fn ordinary(&self) -> &[NeuronId] {
        &self.neurons[..self.width]
    }

    pub fn bias(&self) -> Option<NeuronId> {
        self.neurons.get(self.width).copied()
    }

    pub fn has_bias(&self) -> bool {
        self.neurons.len() > self.width
    }

    pub(crate) fn push_bias(&mut self, neuron: NeuronId) {
        debug_assert!(!self.has_bias(), "a layer carries at most one bias neuron");
        self.neurons.push(neuron);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_sits_after_ordinary_neurons() {
        let mut layer = Layer::new(vec![NeuronId(0), NeuronId(1)]);
        assert_eq!(layer.bias(), None);
        layer.push_bias(NeuronId(7));
        assert_eq!(layer.width(), 2);
        assert_eq!(layer.ordinary(), &[NeuronId(0), NeuronId(1)]);
        assert_eq!(layer.neurons().len(), 3);
        assert_eq!(layer.bias(), Some(NeuronId(7)));
    }
}
