use serde::{Serialize, Deserialize};

use crate::error::{check_width, NetworkError, Result};
use crate::network::Network;

/// Parallel input and target rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Dataset> {
        check_width("dataset targets", inputs.len(), targets.len())?;
        Ok(Dataset { inputs, targets })
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<f64>, &Vec<f64>)> {
        self.inputs.iter().zip(self.targets.iter())
    }

    /// Checks row counts and widths against `network`.
    pub fn validate_for(&self, network: &Network) -> Result<()> {
        network.validate_dataset(&self.inputs, &self.targets)
    }

    /// Deserializes a dataset from a JSON file of the form
    /// `{"inputs": [[..], ..], "targets": [[..], ..]}`.
    pub fn load_json(path: &str) -> Result<Dataset> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let dataset: Dataset = serde_json::from_reader(reader)?;
        check_width("dataset targets", dataset.inputs.len(), dataset.targets.len())?;
        if dataset.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }
        Ok(dataset)
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
