use serde::{Serialize, Deserialize};

use crate::activation::{Activation, ActivationFunction};
use crate::loss::SquaredError;
use crate::network::synapse::{Synapse, SynapseId};

/// Index of a neuron in the network's neuron arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeuronId(pub usize);

#[derive(Debug, Clone)]
pub struct Neuron {
    activation: Activation,
    input: f64,
    output: f64,
    backprop_delta: f64,
    outgoing: Vec<SynapseId>,
    incoming: Vec<SynapseId>,
}

impl Neuron {
    pub fn new(activation: ActivationFunction) -> Neuron {
        Neuron {
            activation: activation.resolve(),
            input: 0.0,
            output: 0.0,
            backprop_delta: 0.0,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// A bias neuron: no inputs, output pinned to `1` once updated.
    pub fn bias() -> Neuron {
        Neuron::new(ActivationFunction::Bias)
    }

    pub fn is_bias(&self) -> bool {
        self.activation.kind == ActivationFunction::Bias
    }

    pub fn input(&self) -> f64 {
        self.input
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn backprop_delta(&self) -> f64 {
        self.backprop_delta
    }

    pub fn outgoing(&self) -> &[SynapseId] {
        &self.outgoing
    }

    pub fn incoming(&self) -> &[SynapseId] {
        &self.incoming
    }

    pub fn set_input(&mut self, x: f64) {
        self.input = x;
    }

    pub fn add_input(&mut self, delta: f64) {
        self.input += delta;
    }

    pub fn update(&mut self) {
        self.output = (self.activation.function)(self.input);
    }

    /// `f'(input)`, the slope at the last accumulated input.
    pub fn derivative(&self) -> f64 {
        (self.activation.derivative)(self.input)
    }

    pub(crate) fn set_backprop_delta(&mut self, delta: f64) {
        self.backprop_delta = delta;
    }

    /// Output-layer delta for squared error: `f'(input) * -(target - output)`.
    pub(crate) fn set_output_delta(&mut self, target: f64) {
        self.backprop_delta = self.derivative() * SquaredError::derivative(target, self.output);
    }

    /// Hidden-layer delta: the downstream deltas weighted by the same
    /// synapses the forward pass used, times `f'(input)`.
    ///
    /// Returned rather than stored because the downstream neurons live in
    /// the same arena as `self`.
    pub fn compute_delta(&self, synapses: &[Synapse], neurons: &[Neuron]) -> f64 {
        let derivative = self.derivative();
        self.outgoing
            .iter()
            .map(|&id| {
                let synapse = &synapses[id.0];
                derivative * synapse.weight() * neurons[synapse.destination().0].backprop_delta
            })
            .sum()
    }

    pub(crate) fn connect_outgoing(&mut self, synapse: SynapseId) {
        self.outgoing.push(synapse);
    }

    pub(crate) fn connect_incoming(&mut self, synapse: SynapseId) {
        self.incoming.push(synapse);
    }
}
