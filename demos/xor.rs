use synapse_nn::{train_loop, ActivationFunction, Dataset, Network, NetworkSpec, TrainConfig};

fn main() -> synapse_nn::Result<()> {
    tracing_subscriber::fmt::init();

    let spec = NetworkSpec::new(
        2,
        vec![4],
        vec![
            ActivationFunction::Identity,
            ActivationFunction::Sigmoid,
            ActivationFunction::Sigmoid,
        ],
        1,
        vec![false, true, true],
        0.5,
    )
    .with_seed(7);
    let mut network = Network::from_spec(&spec)?;

    let dataset = Dataset::new(
        vec![
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ],
        vec![
            vec![1.0],
            vec![0.0],
            vec![1.0],
            vec![0.0],
        ],
    )?;

    let report = train_loop(&mut network, &dataset, &TrainConfig::new(20000))?;
    println!("Epochs: {} final error: {:.6}", report.epochs_run, report.final_error.unwrap_or(f64::NAN));

    for input in &dataset.inputs {
        println!("Input: {:?} -> Output: {:.4}", input, network.infer(input)?[0]);
    }
    Ok(())
}
