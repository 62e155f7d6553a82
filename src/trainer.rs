//! Utilities for training neural networks.

use std::time::Instant;

use crate::error::{Error, Result};

/// Makes a model trainable using gradient descent.
pub trait Trainable {
    /// Input data format.
    type Input;

    /// Output data format.
    type Output;

    /// A container for training updates.
    type Update;

    /// Returns a new, empty model update.
    fn new_update(&self) -> Self::Update;

    /// Checks that the example at `index` fits the model.
    fn validate_example(
        &self,
        index: usize,
        example: &Self::Input,
        expected: &Self::Output,
    ) -> Result<()>;

    /// Using the provided training example, accumulate model updates into
    /// `update`. Returns the squared error of the example prediction.
    fn compute_update(
        &self,
        example: &Self::Input,
        expected: &Self::Output,
        update: &mut Self::Update,
    ) -> Result<f64>;

    /// Applies the mean of the accumulated `update` and resets it, scaling by
    /// the gradient descent `rate`.
    fn apply_update(&mut self, rate: f64, update: &mut Self::Update) -> Result<()>;

    /// Returns the total squared error over `examples`.
    fn cost(&self, examples: &[(Self::Input, Self::Output)]) -> Result<f64>;
}

/// A builder for training new models.
#[derive(Debug)]
pub struct Trainer<T: Trainable> {
    model: T,
    learning_mode: LearningMode,
    learning_rate: f64,
    epochs: usize,
    logging: Logging,
}

impl<T: Trainable> Trainer<T> {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * An online learning mode.
    /// * A learning rate of 0.1.
    /// * Stops after 1000 epochs.
    /// * Logs on training completion.
    pub fn new(model: T) -> Self {
        Trainer {
            model,
            learning_mode: LearningMode::Online,
            learning_rate: 0.1,
            epochs: 1000,
            logging: Logging::Completion,
        }
    }

    /// Sets the `LearningMode` to use for training.
    pub fn learning_mode(mut self, mode: LearningMode) -> Self {
        self.learning_mode = mode;
        self
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the number of passes over the training set.
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Trains a model using the provided labelled data.
    ///
    /// The provided `examples` should be a list of labelled data, where each
    /// element takes the form `(network input, expected output)`.
    ///
    /// Returns:
    ///   The trained model along with the cost over `examples` after every
    ///   epoch, or an error if invalid training parameters were provided.
    pub fn train(mut self, examples: &[(T::Input, T::Output)]) -> Result<Trained<T>> {
        self.validate(examples)?;

        let start_time = Instant::now();
        let mut update = self.model.new_update();
        let mut loss_history = Vec::with_capacity(self.epochs);
        for epoch in 1..=self.epochs {
            match self.learning_mode {
                LearningMode::Online => {
                    for (example, expected) in examples {
                        self.model.compute_update(example, expected, &mut update)?;
                        self.model.apply_update(self.learning_rate, &mut update)?;
                    }
                }
                LearningMode::FullBatch => self.run_batch(examples, &mut update)?,
                LearningMode::MiniBatch(size) => {
                    // A trailing group smaller than `size` is skipped.
                    for batch in examples.chunks_exact(size) {
                        self.run_batch(batch, &mut update)?;
                    }
                }
            }

            let loss = self.model.cost(examples)?;
            self.logging.epoch(epoch, loss);
            loss_history.push(loss);
        }

        let trained = Trained {
            model: self.model,
            loss_history,
        };
        self.logging.completion(self.epochs, &trained, start_time);
        Ok(trained)
    }

    fn run_batch(
        &mut self,
        batch: &[(T::Input, T::Output)],
        update: &mut T::Update,
    ) -> Result<()> {
        for (example, expected) in batch {
            self.model.compute_update(example, expected, update)?;
        }
        self.model.apply_update(self.learning_rate, update)
    }

    fn validate(&self, examples: &[(T::Input, T::Output)]) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidEpochs);
        }
        if !self.learning_rate.is_finite() {
            return Err(Error::InvalidLearningRate(self.learning_rate));
        }
        if examples.is_empty() {
            return Err(Error::EmptyDataset);
        }
        for (index, (example, expected)) in examples.iter().enumerate() {
            self.model.validate_example(index, example, expected)?;
        }
        if let LearningMode::MiniBatch(size) = self.learning_mode {
            if size == 0 || size > examples.len() {
                return Err(Error::InvalidBatchSize {
                    samples: examples.len(),
                    batch_size: size,
                });
            }
        }
        Ok(())
    }
}

/// A model returned by `Trainer::train`, with its training history.
#[derive(Clone, Debug)]
pub struct Trained<T> {
    pub model: T,
    /// The cost over the whole training set after each epoch.
    pub loss_history: Vec<f64>,
}

impl<T> Trained<T> {
    /// Returns the cost after the first epoch.
    pub fn initial_loss(&self) -> f64 {
        self.loss_history.first().copied().unwrap_or(0.0)
    }

    /// Returns the cost after the last epoch.
    pub fn final_loss(&self) -> f64 {
        self.loss_history.last().copied().unwrap_or(0.0)
    }
}

/// The learning mode to use for training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LearningMode {
    /// Apply weight updates after every training example
    Online,
    /// Apply the mean update of the whole training set once per epoch
    FullBatch,
    /// Apply the mean update of consecutive groups of the provided size
    ///
    /// Must be at most the total number of training instances.
    MiniBatch(usize),
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be logged at completion
    Completion,
    /// The loss will be logged after every `n` epochs, and a summary at
    /// completion
    Iterations(usize),
}

impl Logging {
    /// Performs logging after `epoch` of training.
    fn epoch(&self, epoch: usize, loss: f64) {
        if let Logging::Iterations(freq) = *self {
            if freq > 0 && epoch % freq == 0 {
                info!("epoch {}:\tloss={}", epoch, loss);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion<T>(&self, epochs: usize, trained: &Trained<T>, start_time: Instant) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            "ran {} epochs in {:.3} seconds",
            epochs,
            start_time.elapsed().as_secs_f64()
        );
        info!(
            "initial loss: {}, final loss: {}",
            trained.initial_loss(),
            trained.final_loss()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activator::ActivationRegistry;
    use crate::feed_forward::tests::{config, network};
    use crate::feed_forward::Network;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn xor() -> Vec<(Vec<f64>, Vec<f64>)> {
        vec![
            (vec![0.0, 1.0], vec![1.0]),
            (vec![1.0, 0.0], vec![1.0]),
            (vec![0.0, 0.0], vec![0.0]),
            (vec![1.0, 1.0], vec![0.0]),
        ]
    }

    #[test_log::test]
    fn xor_loss_decreases() {
        let network = Network::with_rng(
            &config(&[2, 3, 1], "relu", "sigmoid"),
            &ActivationRegistry::default(),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        let trained = Trainer::new(network)
            .learning_rate(0.5)
            .epochs(256)
            .logging(Logging::Iterations(64))
            .train(&xor())
            .unwrap();
        assert_eq!(trained.loss_history.len(), 256);
        assert!(trained.final_loss() < trained.initial_loss());
    }

    #[test]
    fn batch_mean_of_identical_samples_matches_online() {
        let sample = (vec![0.4, -0.2], vec![1.0]);
        let online = Trainer::new(network(&[2, 3, 1], "tanh", "sigmoid"))
            .learning_rate(0.5)
            .epochs(1)
            .logging(Logging::Silent)
            .train(&[sample.clone()])
            .unwrap();
        let batch = Trainer::new(network(&[2, 3, 1], "tanh", "sigmoid"))
            .learning_mode(LearningMode::FullBatch)
            .learning_rate(0.5)
            .epochs(1)
            .logging(Logging::Silent)
            .train(&vec![sample; 8])
            .unwrap();

        for (id, expected) in online.model.params().iter() {
            let actual = batch.model.params().get(*id).unwrap();
            for (a, e) in actual.weights.iter().zip(&expected.weights) {
                assert!((a - e).abs() < 1e-12);
            }
            assert!((actual.bias - expected.bias).abs() < 1e-12);
        }
    }

    #[test]
    fn every_mode_records_one_loss_per_epoch() {
        for &mode in &[
            LearningMode::Online,
            LearningMode::FullBatch,
            LearningMode::MiniBatch(3),
        ] {
            let trained = Trainer::new(network(&[2, 3, 1], "relu", "sigmoid"))
                .learning_mode(mode)
                .epochs(5)
                .logging(Logging::Silent)
                .train(&xor())
                .unwrap();
            assert_eq!(trained.loss_history.len(), 5);
            assert_eq!(trained.final_loss(), trained.model.cost(&xor()).unwrap());
        }
    }

    #[test]
    fn mini_batch_skips_the_trailing_group() {
        // With a batch size of 3, only the first three examples are used.
        let examples = xor();
        let trained = Trainer::new(network(&[2, 3, 1], "relu", "sigmoid"))
            .learning_mode(LearningMode::MiniBatch(3))
            .epochs(1)
            .logging(Logging::Silent)
            .train(&examples)
            .unwrap();
        let expected = Trainer::new(network(&[2, 3, 1], "relu", "sigmoid"))
            .learning_mode(LearningMode::FullBatch)
            .epochs(1)
            .logging(Logging::Silent)
            .train(&examples[..3])
            .unwrap();
        assert_eq!(trained.model.params(), expected.model.params());
    }

    #[test]
    fn rejects_bad_parameters() {
        let train = |trainer: Trainer<Network>, examples: &[(Vec<f64>, Vec<f64>)]| {
            trainer.logging(Logging::Silent).train(examples).map(|_| ())
        };
        let fresh = || Trainer::new(network(&[2, 3, 1], "relu", "sigmoid"));

        assert!(matches!(train(fresh().epochs(0), &xor()), Err(Error::InvalidEpochs)));
        assert!(matches!(
            train(fresh().learning_rate(f64::NAN), &xor()),
            Err(Error::InvalidLearningRate(_))
        ));
        assert!(matches!(train(fresh(), &[]), Err(Error::EmptyDataset)));
        assert!(matches!(
            train(fresh().learning_mode(LearningMode::MiniBatch(5)), &xor()),
            Err(Error::InvalidBatchSize {
                samples: 4,
                batch_size: 5
            })
        ));
        assert!(matches!(
            train(fresh().learning_mode(LearningMode::MiniBatch(0)), &xor()),
            Err(Error::InvalidBatchSize { batch_size: 0, .. })
        ));

        let mut examples = xor();
        examples[2].0.push(1.0);
        assert!(matches!(
            train(fresh(), &examples),
            Err(Error::SampleInputs {
                sample: 2,
                expected: 2,
                got: 3
            })
        ));
        let mut examples = xor();
        examples[1].1.clear();
        assert!(matches!(
            train(fresh(), &examples),
            Err(Error::SampleOutputs { sample: 1, .. })
        ));
    }
}
