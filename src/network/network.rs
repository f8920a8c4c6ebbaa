use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::activation::ActivationFunction;
use crate::error::{check_width, NetworkError, Result};
use crate::layers::Layer;
use crate::loss::SquaredError;
use crate::network::neuron::{Neuron, NeuronId};
use crate::network::spec::NetworkSpec;
use crate::network::synapse::{Synapse, SynapseId};
use crate::network::weights::WeightEntry;

/// A fully connected feed-forward network stored as a neuron/synapse graph.
///
/// Neurons and synapses live in two arenas owned by the network and refer to
/// each other by index.  Nothing is added or removed after construction;
/// forward passes and training only touch neuron state and synapse weights.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    neurons: Vec<Neuron>,
    synapses: Vec<Synapse>,
    /// `(layer, index within layer)` for every neuron, by `NeuronId`.
    positions: Vec<(usize, usize)>,
}

impl Network {
    /// Builds the topology described by `spec`, drawing initial weights
    /// from `rng`.
    ///
    /// Ordinary synapses are created first, layer by layer, source by
    /// destination, each weighted `1 - U[0,1) * 4`.  Bias neurons follow:
    /// for every layer `l >= 1` with `has_bias[l]`, one bias neuron is
    /// appended to layer `l - 1` and wired to each ordinary neuron of layer
    /// `l` with weight `U[0,1)`.  Draws happen in exactly this order.
    pub fn new<R: Rng>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;

        let mut network = Network {
            layers: Vec::with_capacity(spec.layer_count()),
            neurons: Vec::new(),
            synapses: Vec::new(),
            positions: Vec::new(),
        };

        for (width, &activation) in spec.layer_widths().into_iter().zip(spec.activations.iter()) {
            let layer = network.layers.len();
            let ids = (0..width)
                .map(|index| network.push_neuron(Neuron::new(activation), layer, index))
                .collect();
            network.layers.push(Layer::new(ids));
        }

        for layer in 0..network.layers.len() - 1 {
            for source in 0..network.layers[layer].width() {
                for destination in 0..network.layers[layer + 1].width() {
                    let weight = 1.0 - rng.gen::<f64>() * 4.0;
                    network.connect(
                        network.layers[layer].neurons()[source],
                        network.layers[layer + 1].neurons()[destination],
                        weight,
                        spec.learning_rate,
                    );
                }
            }
        }

        for layer in 1..network.layers.len() {
            if !spec.has_bias[layer] {
                continue;
            }
            let mut bias = Neuron::bias();
            bias.update();
            let index = network.layers[layer - 1].neurons().len();
            let bias_id = network.push_neuron(bias, layer - 1, index);
            network.layers[layer - 1].push_bias(bias_id);

            for destination in 0..network.layers[layer].width() {
                let weight = rng.gen::<f64>();
                network.connect(
                    bias_id,
                    network.layers[layer].neurons()[destination],
                    weight,
                    spec.learning_rate,
                );
            }
        }

        debug!(
            layers = network.layers.len(),
            neurons = network.neurons.len(),
            synapses = network.synapses.len(),
            "network constructed"
        );
        Ok(network)
    }

    /// Builds the network with a `ChaCha8Rng` seeded from `seed`, so the
    /// same spec and seed always produce the same initial weights.
    pub fn with_seed(spec: &NetworkSpec, seed: u64) -> Result<Network> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Network::new(spec, &mut rng)
    }

    /// Uses `spec.seed` when present, the thread-local generator otherwise.
    pub fn from_spec(spec: &NetworkSpec) -> Result<Network> {
        match spec.seed {
            Some(seed) => Network::with_seed(spec, seed),
            None => Network::new(spec, &mut rand::thread_rng()),
        }
    }

    /// Positional form of [`Network::new`].
    pub fn construct<R: Rng>(
        input_count: usize,
        hidden_layers: &[usize],
        activations: &[ActivationFunction],
        output_count: usize,
        has_bias: &[bool],
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<Network> {
        let spec = NetworkSpec::new(
            input_count,
            hidden_layers.to_vec(),
            activations.to_vec(),
            output_count,
            has_bias.to_vec(),
            learning_rate,
        );
        Network::new(&spec, rng)
    }

    fn push_neuron(&mut self, neuron: Neuron, layer: usize, index: usize) -> NeuronId {
        let id = NeuronId(self.neurons.len());
        self.neurons.push(neuron);
        self.positions.push((layer, index));
        id
    }

    fn connect(&mut self, source: NeuronId, destination: NeuronId, weight: f64, learning_rate: f64) {
        let id = SynapseId(self.synapses.len());
        self.synapses.push(Synapse::new(source, destination, weight, learning_rate));
        self.neurons[source.0].connect_outgoing(id);
        self.neurons[destination.0].connect_incoming(id);
    }

    // ------------------------------------------------------------------
    // Topology queries
    // ------------------------------------------------------------------

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }

    /// Ordinary neuron count of `layer`.
    pub fn layer_width(&self, layer: usize) -> Option<usize> {
        self.layers.get(layer).map(Layer::width)
    }

    pub fn input_width(&self) -> usize {
        self.layers[0].width()
    }

    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1].width()
    }

    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Synapses leaving `layer`, its bias neuron included.  Zero for the
    /// output layer and for indices past it.
    pub fn synapse_count_by_layer(&self, layer: usize) -> usize {
        self.layers.get(layer).map_or(0, |l| {
            l.neurons().iter().map(|id| self.neurons[id.0].outgoing().len()).sum()
        })
    }

    pub fn neuron_output(&self, layer: usize, index: usize) -> Option<f64> {
        let id = self.layers.get(layer)?.neurons().get(index)?;
        Some(self.neurons[id.0].output())
    }

    /// Output of the bias neuron carried by `layer`, if it has one.
    pub fn bias_output(&self, layer: usize) -> Option<f64> {
        let id = self.layers.get(layer)?.bias()?;
        Some(self.neurons[id.0].output())
    }

    // ------------------------------------------------------------------
    // Forward pass
    // ------------------------------------------------------------------

    /// Loads `values` into the input layer and updates those neurons.
    pub fn set_inputs(&mut self, values: &[f64]) -> Result<()> {
        check_width("network input", self.layers[0].width(), values.len())?;
        for (id, &value) in self.layers[0].ordinary().iter().zip(values) {
            let neuron = &mut self.neurons[id.0];
            neuron.set_input(value);
            neuron.update();
        }
        Ok(())
    }

    /// Propagates the current inputs through every layer.
    ///
    /// Each layer is updated, the next layer's accumulators are zeroed and
    /// every outgoing synapse fires, in source-neuron order.  The last layer
    /// is updated once more at the end so it reflects what it just received.
    pub fn feed_forward(&mut self) {
        let Network { layers, neurons, synapses, .. } = self;
        let last = layers.len() - 1;

        for layer in 0..layers.len() {
            for id in layers[layer].neurons() {
                neurons[id.0].update();
            }
            if layer < last {
                for id in layers[layer + 1].neurons() {
                    neurons[id.0].set_input(0.0);
                }
            }
            for id in layers[layer].neurons() {
                for k in 0..neurons[id.0].outgoing().len() {
                    let synapse = neurons[id.0].outgoing()[k];
                    synapses[synapse.0].activate(neurons);
                }
            }
        }

        for id in layers[last].neurons() {
            neurons[id.0].update();
        }
    }

    /// Current outputs of the output layer, in order.
    pub fn outputs(&self) -> Vec<f64> {
        self.layers[self.layers.len() - 1]
            .ordinary()
            .iter()
            .map(|id| self.neurons[id.0].output())
            .collect()
    }

    /// Sets the inputs, runs one forward pass and returns the outputs.
    pub fn infer(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.set_inputs(input)?;
        self.feed_forward();
        Ok(self.outputs())
    }

    // ------------------------------------------------------------------
    // Training
    // ------------------------------------------------------------------

    /// Checks that `inputs`/`targets` form a non-empty dataset shaped for
    /// this network.
    pub fn validate_dataset(&self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
        check_width("dataset targets", inputs.len(), targets.len())?;
        if inputs.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }
        let (input_width, output_width) = (self.input_width(), self.output_width());
        for (input, target) in inputs.iter().zip(targets) {
            check_width("input row", input_width, input.len())?;
            check_width("target row", output_width, target.len())?;
        }
        Ok(())
    }

    /// Trains for `epochs` full-batch epochs over the dataset.
    ///
    /// Every epoch sweeps all examples in order, accumulating each
    /// synapse's gradient, then applies exactly one weight update per
    /// synapse using the mean gradient.  Nothing is modified if the
    /// dataset is rejected.
    pub fn back_propagate(&mut self, inputs: &[Vec<f64>], targets: &[Vec<f64>], epochs: usize) -> Result<()> {
        self.validate_dataset(inputs, targets)?;
        for _ in 0..epochs {
            self.sweep(inputs, targets)?;
        }
        Ok(())
    }

    /// A single validated epoch.  Returns the mean `error_total` per
    /// example, measured with the weights the epoch started from.
    pub fn train_epoch(&mut self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
        self.validate_dataset(inputs, targets)?;
        self.sweep(inputs, targets)
    }

    fn sweep(&mut self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
        for synapse in &mut self.synapses {
            synapse.clear_gradient();
        }

        let mut total_error = 0.0;
        for (input, target) in inputs.iter().zip(targets) {
            self.set_inputs(input)?;
            self.feed_forward();
            total_error += SquaredError::total(target, &self.outputs())?;

            self.compute_output_deltas(target);
            self.compute_hidden_deltas();

            let Network { neurons, synapses, .. } = self;
            for synapse in synapses.iter_mut() {
                synapse.accumulate_gradient(neurons);
            }
        }

        for synapse in &mut self.synapses {
            synapse.apply_epoch_update()?;
        }
        let mean_error = total_error / inputs.len() as f64;
        debug!(mean_error, "epoch weights updated");
        Ok(mean_error)
    }

    fn compute_output_deltas(&mut self, target: &[f64]) {
        let last = self.layers.len() - 1;
        for (id, &t) in self.layers[last].ordinary().iter().zip(target) {
            self.neurons[id.0].set_output_delta(t);
        }
    }

    /// From the last hidden layer down to layer 1; the input layer has no
    /// incoming synapses to train.
    fn compute_hidden_deltas(&mut self) {
        let last = self.layers.len() - 1;
        for layer in (1..last).rev() {
            for id in self.layers[layer].neurons() {
                let delta = self.neurons[id.0].compute_delta(&self.synapses, &self.neurons);
                self.neurons[id.0].set_backprop_delta(delta);
            }
        }
    }

    // ------------------------------------------------------------------
    // Weights
    // ------------------------------------------------------------------

    fn find_synapse(&self, layer: usize, source: usize, destination: usize) -> Result<SynapseId> {
        let unknown = NetworkError::UnknownSynapse { layer, source_index: source, destination };
        let (Some(from), Some(next)) = (self.layers.get(layer), self.layers.get(layer + 1)) else {
            return Err(unknown);
        };
        let (Some(&src), Some(&dst)) = (from.neurons().get(source), next.ordinary().get(destination)) else {
            return Err(unknown);
        };
        self.neurons[src.0]
            .outgoing()
            .iter()
            .copied()
            .find(|id| self.synapses[id.0].destination() == dst)
            .ok_or(unknown)
    }

    /// Weight of the synapse from neuron `source` of `layer` to neuron
    /// `destination` of `layer + 1`.
    pub fn weight(&self, layer: usize, source: usize, destination: usize) -> Result<f64> {
        let id = self.find_synapse(layer, source, destination)?;
        Ok(self.synapses[id.0].weight())
    }

    pub fn set_weight(&mut self, layer: usize, source: usize, destination: usize, weight: f64) -> Result<()> {
        check_finite(weight)?;
        let id = self.find_synapse(layer, source, destination)?;
        self.synapses[id.0].set_weight(weight);
        Ok(())
    }

    /// Every weight keyed by position, in construction order.
    pub fn weights(&self) -> Vec<WeightEntry> {
        self.synapses
            .iter()
            .map(|synapse| {
                let (layer, source) = self.positions[synapse.source().0];
                let (_, destination) = self.positions[synapse.destination().0];
                WeightEntry { layer, source, destination, weight: synapse.weight() }
            })
            .collect()
    }

    /// Applies `entries` over the current weights.  Every entry is checked
    /// before any weight changes; synapses not listed keep their weight.
    pub fn load_weights(&mut self, entries: &[WeightEntry]) -> Result<()> {
        let resolved = entries
            .iter()
            .map(|e| {
                check_finite(e.weight)?;
                Ok((self.find_synapse(e.layer, e.source, e.destination)?, e.weight))
            })
            .collect::<Result<Vec<_>>>()?;
        for (id, weight) in resolved {
            self.synapses[id.0].set_weight(weight);
        }
        Ok(())
    }
}

fn check_finite(weight: f64) -> Result<()> {
    if weight.is_finite() {
        Ok(())
    } else {
        Err(NetworkError::Configuration(format!("synapse weight must be finite, got {weight}")))
    }
}
