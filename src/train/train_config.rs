use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`       — number of full-batch epochs; each ends in exactly one
///                    weight update per synapse
/// - `log_interval` — an `info` line is emitted every this many epochs
///                    (and for the final epoch); `0` disables it
/// - `progress_tx`  — optional channel sender; one `EpochStats` is sent per
///                    completed epoch.  If the receiver is dropped the loop
///                    terminates early.
/// - `stop_flag`    — optional atomic flag; when set to `true` from another
///                    thread the loop stops before starting the next epoch.
pub struct TrainConfig {
    pub epochs: usize,
    pub log_interval: usize,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with no progress channel and no stop flag,
    /// logging ten times over the run.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            log_interval: (epochs / 10).max(1),
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }
}
