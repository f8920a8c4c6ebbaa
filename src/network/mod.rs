pub mod network;
pub mod neuron;
pub mod spec;
pub mod synapse;
pub mod weights;

pub use network::Network;
pub use neuron::{Neuron, NeuronId};
pub use spec::NetworkSpec;
pub use synapse::{Synapse, SynapseId};
pub use weights::WeightEntry;
