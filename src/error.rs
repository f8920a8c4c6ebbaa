use thiserror::Error;

/// Everything that can go wrong while building, feeding or training a network.
///
/// Numeric saturation (e.g. a sigmoid input of `1e6`) is clamped inside the
/// activation functions and never shows up here.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Construction parameters that cannot describe a valid topology.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("no synapse from neuron {source_index} of layer {layer} to neuron {destination} of layer {}", .layer + 1)]
    UnknownSynapse {
        layer: usize,
        source_index: usize,
        destination: usize,
    },

    /// A full-batch update averages over the dataset, so it must have rows.
    #[error("training dataset is empty")]
    EmptyDataset,

    #[error("invalid activation variant: {0}")]
    InvalidActivationVariant(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Shorthand used by the width checks scattered across the crate.
pub(crate) fn check_width(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetworkError::DimensionMismatch { context, expected, actual })
    }
}
