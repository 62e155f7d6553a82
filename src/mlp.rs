//! A multilayer perceptron built and trained from a `ModelConfig`.

use rand::Rng;

use crate::activator::ActivationRegistry;
use crate::config::{ModelConfig, TrainType};
use crate::error::{Error, Result};
use crate::export::ExportedModel;
use crate::feed_forward::Network;
use crate::trainer::{LearningMode, Logging, Trainable, Trainer};

/// Epochs between two loss reports during training.
const LOG_EVERY: usize = 100;

/// A network together with the configuration it was built from.
#[derive(Clone, Debug)]
pub struct Mlp {
    config: ModelConfig,
    network: Network,
    initial: ExportedModel,
}

/// The outcome of `Mlp::train`.
#[derive(Clone, Debug)]
pub struct TrainingResult {
    pub model: Mlp,
    /// The total squared error over the training set after each epoch.
    pub loss_history: Vec<f64>,
    pub initial_loss: f64,
    /// The loss after the second epoch, if there was one.
    pub after_first_epoch_loss: Option<f64>,
    pub final_loss: f64,
}

impl Mlp {
    /// Validates `config` and builds a randomly initialized network.
    pub fn new(config: ModelConfig, registry: &ActivationRegistry) -> Result<Self> {
        let network = Network::new(&config, registry)?;
        Ok(Mlp::from_network(config, network))
    }

    /// Like `new`, drawing the initial parameters from `rng`.
    pub fn with_rng<R: Rng>(
        config: ModelConfig,
        registry: &ActivationRegistry,
        rng: &mut R,
    ) -> Result<Self> {
        let network = Network::with_rng(&config, registry, rng)?;
        Ok(Mlp::from_network(config, network))
    }

    fn from_network(config: ModelConfig, network: Network) -> Self {
        let initial = network.export();
        debug!(
            "built {:?} network with {} units for {}",
            config.train_type,
            network.params().len(),
            config.task
        );
        Mlp {
            config,
            network,
            initial,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Returns the parameters the network had when it was built.
    pub fn initial_parameters(&self) -> &ExportedModel {
        &self.initial
    }

    pub fn export(&self) -> ExportedModel {
        self.network.export()
    }

    pub fn import_json(&mut self, json: &str) -> Result<()> {
        self.network.import_json(json)
    }

    /// Checks that `train(samples, epochs)` would accept its arguments,
    /// without consuming the model.
    ///
    /// For classification tasks every desired value must be 0 or 1.
    pub fn check_training(
        &self,
        samples: &[(Vec<f64>, Vec<f64>)],
        epochs: usize,
    ) -> Result<()> {
        if samples.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if epochs == 0 {
            return Err(Error::InvalidEpochs);
        }
        self.config.learning_rate()?;
        let task = self.config.task;
        for (sample, (features, desired)) in samples.iter().enumerate() {
            if task.is_classification() {
                let not_binary = desired.iter().find(|&&y| y != 0.0 && y != 1.0);
                if let Some(&value) = not_binary {
                    return Err(Error::NonBinaryTarget {
                        task,
                        sample,
                        value,
                    });
                }
            }
            self.network.validate_example(sample, features, desired)?;
        }
        if let LearningMode::MiniBatch(size) = self.learning_mode() {
            if size == 0 || size > samples.len() {
                return Err(Error::InvalidBatchSize {
                    samples: samples.len(),
                    batch_size: size,
                });
            }
        }
        Ok(())
    }

    fn learning_mode(&self) -> LearningMode {
        match self.config.train_type {
            TrainType::Online => LearningMode::Online,
            TrainType::Fullbatch => LearningMode::FullBatch,
            TrainType::Minibatch => {
                LearningMode::MiniBatch(self.config.batch_size())
            }
        }
    }

    /// Trains the network for `epochs` passes over `samples`, updating the
    /// parameters the way the configured train type says.
    ///
    /// The arguments are checked with `check_training` first. Training
    /// consumes the model, so keep a clone (or call `check_training`) if it
    /// must survive a rejected call.
    pub fn train(
        self,
        samples: &[(Vec<f64>, Vec<f64>)],
        epochs: usize,
    ) -> Result<TrainingResult> {
        self.check_training(samples, epochs)?;

        let learning_mode = self.learning_mode();
        let Mlp {
            config,
            network,
            initial,
        } = self;
        let trained = Trainer::new(network)
            .learning_mode(learning_mode)
            .learning_rate(config.learning_rate()?)
            .epochs(epochs)
            .logging(Logging::Iterations(LOG_EVERY))
            .train(samples)?;

        Ok(TrainingResult {
            initial_loss: trained.initial_loss(),
            after_first_epoch_loss: trained.loss_history.get(1).copied(),
            final_loss: trained.final_loss(),
            loss_history: trained.loss_history,
            model: Mlp {
                config,
                network: trained.model,
                initial,
            },
        })
    }
}
