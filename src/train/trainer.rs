use crate::{error::Result, network::Network};

/// Trains `network` for `epochs` full-batch epochs.
///
/// Fails without touching any weight when the dataset is empty, the row
/// counts differ, or a row's width does not match its layer.
pub fn train_network(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    epochs: usize,
) -> Result<()> {
    network.back_propagate(inputs, targets, epochs)
}
