pub mod error;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use activation::activation::ActivationFunction;
pub use layers::layer::Layer;
pub use network::network::Network;
pub use network::spec::NetworkSpec;
pub use network::weights::WeightEntry;
pub use loss::squared_error::{error_total, SquaredError};
pub use train::dataset::Dataset;
pub use train::trainer::train_network;
pub use train::loop_fn::train_loop;
pub use train::train_config::TrainConfig;
