use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::Result;
use crate::network::Network;
use crate::train::dataset::Dataset;
use crate::train::epoch_stats::{EpochStats, TrainReport};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for up to `config.epochs` full-batch epochs over
/// `dataset` and reports how far it got.
///
/// Each iteration is exactly one `Network::back_propagate` epoch: a sweep
/// over every example followed by one weight update per synapse.
///
/// # Early termination
/// The loop stops between epochs if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// The dataset is validated before the first epoch; nothing is modified if
/// it is empty or mis-shaped.
pub fn train_loop(network: &mut Network, dataset: &Dataset, config: &TrainConfig) -> Result<TrainReport> {
    dataset.validate_for(network)?;

    let mut report = TrainReport {
        epochs_run: 0,
        final_error: None,
        stopped_early: false,
    };

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            warn!(epoch, "stop flag set, ending training early");
            report.stopped_early = true;
            break;
        }

        let t_start = Instant::now();
        let mean_error = network.train_epoch(&dataset.inputs, &dataset.targets)?;
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        report.epochs_run = epoch;
        report.final_error = Some(mean_error);

        if should_log(epoch, config) {
            info!(epoch, total = config.epochs, mean_error, "training progress");
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            mean_error,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                if epoch < config.epochs {
                    warn!(epoch, "progress receiver dropped, ending training early");
                    report.stopped_early = true;
                }
                break;
            }
        }

        // Check stop flag again so a stop raised during the last epoch is reported.
        if stop_requested(config) {
            if epoch < config.epochs {
                warn!(epoch, "stop flag set, ending training early");
            }
            report.stopped_early = true;
            break;
        }
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn should_log(epoch: usize, config: &TrainConfig) -> bool {
    config.log_interval > 0 && (epoch % config.log_interval == 0 || epoch == config.epochs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    use crate::activation::ActivationFunction::*;
    use crate::error::NetworkError;
    use crate::network::NetworkSpec;

    fn line_fit() -> (Network, Dataset) {
        let spec = NetworkSpec::new(1, vec![], vec![Identity, Identity], 1, vec![false, true], 0.1);
        let net = Network::with_seed(&spec, 11).unwrap();
        let data = Dataset::new(
            vec![vec![0.0], vec![0.5], vec![1.0]],
            vec![vec![1.0], vec![2.0], vec![3.0]],
        )
        .unwrap();
        (net, data)
    }

    #[test]
    fn runs_every_epoch_and_reports_progress() {
        let (mut net, data) = line_fit();
        let (tx, rx) = mpsc::channel();
        let config = TrainConfig::new(5).with_progress(tx);
        let report = train_loop(&mut net, &data, &config).unwrap();
        drop(config);

        let stats: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(report.epochs_run, 5);
        assert!(!report.stopped_early);
        assert_eq!(stats.len(), 5);
        assert_eq!(stats[4].epoch, 5);
        assert_eq!(stats[4].total_epochs, 5);
        assert_eq!(report.final_error, Some(stats[4].mean_error));
    }

    #[test]
    fn stop_flag_halts_before_training() {
        let (mut net, data) = line_fit();
        let before = net.weights();
        let flag = Arc::new(AtomicBool::new(true));
        let config = TrainConfig::new(100).with_stop_flag(flag);
        let report = train_loop(&mut net, &data, &config).unwrap();
        assert_eq!(report.epochs_run, 0);
        assert!(report.stopped_early);
        assert_eq!(report.final_error, None);
        assert_eq!(net.weights(), before);
    }

    #[test]
    fn stop_raised_mid_run_ends_after_current_epoch() {
        let (mut net, data) = line_fit();
        let flag = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();
        let total = 1_000_000;
        let config = TrainConfig::new(total)
            .with_log_interval(0)
            .with_progress(tx)
            .with_stop_flag(flag.clone());

        // Raise the flag once the first epoch has finished; keep the
        // receiver alive so only the flag can end the run.
        let watcher = std::thread::spawn(move || {
            let first: EpochStats = rx.recv().unwrap();
            flag.store(true, Ordering::Relaxed);
            (first.epoch, rx)
        });

        let report = train_loop(&mut net, &data, &config).unwrap();
        let (first_epoch, _rx) = watcher.join().unwrap();

        assert_eq!(first_epoch, 1);
        assert!(report.stopped_early);
        assert!(report.epochs_run >= 1 && report.epochs_run < total);
        assert!(report.final_error.unwrap().is_finite());
    }

    #[test]
    fn dropped_receiver_stops_after_first_epoch() {
        let (mut net, data) = line_fit();
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let config = TrainConfig::new(10).with_progress(tx);
        let report = train_loop(&mut net, &data, &config).unwrap();
        assert_eq!(report.epochs_run, 1);
        assert!(report.stopped_early);
    }

    #[test]
    fn empty_dataset_is_rejected_up_front() {
        let (mut net, _) = line_fit();
        let empty = Dataset::default();
        let config = TrainConfig::new(3);
        assert!(matches!(train_loop(&mut net, &empty, &config), Err(NetworkError::EmptyDataset)));
    }
}
