//! Trains a multilayer perceptron.
//!
//! Usage: `train [CONFIG.json DATASET.json EPOCHS]`
//!
//! Without arguments, learns the XOR function. Set `RUST_LOG=info` to see
//! the loss while training.

extern crate env_logger;
extern crate perceptron;

use std::env;
use std::error::Error;
use std::process;

use perceptron::{ActivationRegistry, Dataset, Mlp, ModelConfig};

const XOR_CONFIG: &str = r#"{
    "task": "binary_classification",
    "trainType": "online",
    "hyperparameters": { "learningRate": 0.5 },
    "layers": [
        { "type": "input",  "inputs": 2 },
        { "type": "hidden", "inputs": 2, "units": 3, "activation": "relu" },
        { "type": "output", "inputs": 3, "units": 1, "activation": "sigmoid" }
    ]
}"#;

const XOR_DATASET: &str = "[[[0, 1], [1]], [[1, 0], [1]], [[0, 0], [0]], [[1, 1], [0]]]";

const XOR_EPOCHS: usize = 1000;

fn load(args: &[String]) -> Result<(ModelConfig, Dataset, usize), Box<dyn Error>> {
    match args {
        [] => Ok((
            ModelConfig::from_json(XOR_CONFIG)?,
            Dataset::from_json(XOR_DATASET)?,
            XOR_EPOCHS,
        )),
        [config, dataset, epochs] => Ok((
            ModelConfig::from_path(config)?,
            Dataset::from_path(dataset)?,
            epochs.parse()?,
        )),
        _ => Err("usage: train [CONFIG.json DATASET.json EPOCHS]".into()),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (config, dataset, epochs) = load(&args)?;

    let mlp = Mlp::new(config, &ActivationRegistry::default())?;
    let result = mlp.train(dataset.samples(), epochs)?;

    println!("Initial loss: {}", result.initial_loss);
    if let Some(loss) = result.after_first_epoch_loss {
        println!("Loss after the first epoch: {}", loss);
    }
    println!("Final loss: {}", result.final_loss);
    println!();
    for (features, desired) in dataset.samples() {
        let estimated = result.model.network().run(features)?;
        println!("{:?} -> {:?} (desired {:?})", features, estimated, desired);
    }
    println!();
    println!("{}", result.model.export().to_json()?);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
