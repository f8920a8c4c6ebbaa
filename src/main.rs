// Trains a network described by a JSON spec on a JSON dataset.
//
//   synapse-nn <spec.json> <dataset.json> [epochs]
//
// See `cargo run --example xor` for a self-contained demo.
use std::process::ExitCode;

use synapse_nn::{error_total, train_loop, Dataset, Network, NetworkSpec, TrainConfig};

const DEFAULT_EPOCHS: usize = 1000;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <spec.json> <dataset.json> [epochs]", args[0]);
        return ExitCode::from(2);
    }

    match run(&args[1], &args[2], args.get(3).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(spec_path: &str, dataset_path: &str, epochs: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let epochs = match epochs {
        Some(text) => text.parse()?,
        None => DEFAULT_EPOCHS,
    };

    let spec = NetworkSpec::load_json(spec_path)?;
    let dataset = Dataset::load_json(dataset_path)?;
    let mut network = Network::from_spec(&spec)?;

    let report = train_loop(&mut network, &dataset, &TrainConfig::new(epochs))?;
    println!(
        "trained {} epoch(s), final mean error {:.6}",
        report.epochs_run,
        report.final_error.unwrap_or(f64::NAN)
    );

    for (input, target) in dataset.iter() {
        let output = network.infer(input)?;
        let error = error_total(target, &output)?;
        println!("{input:?} -> {output:.4?} (target {target:?}, error {error:.6})");
    }
    Ok(())
}
