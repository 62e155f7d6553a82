//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network).
//!
//! A `Network` owns its layers and a `ParameterStore` with the weights and
//! bias of every unit. Evaluating a sample produces a `ForwardPass`, which
//! records everything the gradient engine needs to differentiate that sample.

use std::mem;

use rand::Rng;

use crate::activator::ActivationRegistry;
use crate::backprop;
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::gradient::GradientStore;
use crate::layer::Layer;
use crate::optimizer::GradientDescent;
use crate::params::{ParameterStore, UnitId};
use crate::trainer::Trainable;
use crate::unit::Unit;

/// A Feedforward neural network
#[derive(Clone, Debug)]
pub struct Network {
    /// The width of the input layer.
    input_len: usize,
    /// Every layer except the input layer; the last one is the output layer.
    layers: Vec<Layer>,
    params: ParameterStore,
}

impl Network {
    /// Creates a new, untrained network described by `config`.
    ///
    /// Every weight and bias is sampled uniformly from `[0, 1)`.
    pub fn new(config: &ModelConfig, registry: &ActivationRegistry) -> Result<Self> {
        Network::with_rng(config, registry, &mut rand::thread_rng())
    }

    /// Creates a new, untrained network, drawing its initial parameters from
    /// `rng`.
    pub fn with_rng<R: Rng>(
        config: &ModelConfig,
        registry: &ActivationRegistry,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate(registry)?;

        let mut layers = Vec::with_capacity(config.layers.len() - 1);
        let mut params = ParameterStore::new();
        for (index, layer_config) in config.layers[1..].iter().enumerate() {
            let name = layer_config
                .activation
                .as_deref()
                .ok_or(Error::MissingActivation(index + 1))?;
            let layer = Layer::new(
                index,
                layer_config.layer_type,
                (name, registry.get(name)?),
                layer_config.inputs,
                layer_config.units,
            );
            layer.initialize(&mut params, &mut *rng);
            debug!(
                "layer {}: {} inputs, {} {} units",
                index,
                layer.input_len(),
                layer.output_len(),
                name
            );
            layers.push(layer);
        }

        Ok(Network {
            input_len: config.input_len(),
            layers,
            params,
        })
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.output_layer().output_len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Returns the layer fed by the outputs of `layer`, if there is one.
    pub fn next_layer(&self, layer: &Layer) -> Option<&Layer> {
        self.layers.get(layer.index() + 1)
    }

    pub fn output_layer(&self) -> &Layer {
        // Construction guarantees at least one layer besides the input layer.
        &self.layers[self.layers.len() - 1]
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.layer(id.layer).and_then(|layer| layer.unit(id.unit))
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.layers.iter().flat_map(|layer| layer.units().iter())
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }

    /// Feeds `features` through the network, recording the inputs, potentials
    /// and outputs of every layer.
    pub fn evaluate(&self, features: &[f64]) -> Result<ForwardPass> {
        if features.len() != self.input_len {
            return Err(Error::BadInputs {
                expected: self.input_len,
                got: features.len(),
            });
        }

        let mut pass = ForwardPass::with_capacity(self.layers.len());
        let mut inputs = features.to_vec();
        for layer in &self.layers {
            let mut potentials = vec![0.0; layer.output_len()];
            let mut outputs = vec![0.0; layer.output_len()];
            layer.forward(&self.params, &inputs, &mut potentials, &mut outputs)?;

            // The outputs of a layer are the inputs of the next one.
            let next_inputs = if layer.is_output() {
                Vec::new()
            } else {
                outputs.clone()
            };
            pass.inputs.push(mem::replace(&mut inputs, next_inputs));
            pass.potentials.push(potentials);
            pass.outputs.push(outputs);
        }
        Ok(pass)
    }

    /// Feeds the provided `features` through the network, returning the
    /// output layer.
    pub fn run(&self, features: &[f64]) -> Result<Vec<f64>> {
        let mut pass = self.evaluate(features)?;
        Ok(pass.outputs.pop().unwrap_or_default())
    }

    /// Sums the squared error of every output of every example.
    ///
    /// The sum is not averaged over examples or outputs. Every example must
    /// have exactly one desired value per output.
    pub fn cost<I, O>(&self, examples: &[(I, O)]) -> Result<f64>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        let mut cost = 0.0;
        for (sample, (input, expected)) in examples.iter().enumerate() {
            let expected = expected.as_ref();
            if expected.len() != self.output_len() {
                return Err(Error::SampleOutputs {
                    sample,
                    expected: self.output_len(),
                    got: expected.len(),
                });
            }
            let pass = self.evaluate(input.as_ref())?;
            cost += squared_error(pass.estimated_values(), expected);
        }
        Ok(cost)
    }
}

impl Trainable for Network {
    type Input = Vec<f64>;
    type Output = Vec<f64>;
    type Update = GradientStore;

    fn new_update(&self) -> GradientStore {
        GradientStore::new()
    }

    fn validate_example(&self, index: usize, input: &Vec<f64>, expected: &Vec<f64>) -> Result<()> {
        if input.len() != self.input_len() {
            return Err(Error::SampleInputs {
                sample: index,
                expected: self.input_len(),
                got: input.len(),
            });
        }
        if expected.len() != self.output_len() {
            return Err(Error::SampleOutputs {
                sample: index,
                expected: self.output_len(),
                got: expected.len(),
            });
        }
        Ok(())
    }

    fn compute_update(
        &self,
        example: &Vec<f64>,
        expected: &Vec<f64>,
        update: &mut GradientStore,
    ) -> Result<f64> {
        let pass = self.evaluate(example)?;
        let gradients = backprop::backpropagate(self, &pass, expected)?;
        update.accumulate(&gradients);
        Ok(squared_error(pass.estimated_values(), expected))
    }

    fn apply_update(&mut self, rate: f64, update: &mut GradientStore) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        GradientDescent::new(rate).apply(&update.mean(), self)?;
        update.clear();
        Ok(())
    }

    fn cost(&self, examples: &[(Vec<f64>, Vec<f64>)]) -> Result<f64> {
        Network::cost(self, examples)
    }
}

/// Everything computed while feeding one sample through a network.
///
/// A pass belongs to a single sample; two interleaved evaluations each get
/// their own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForwardPass {
    inputs: Vec<Vec<f64>>,
    potentials: Vec<Vec<f64>>,
    outputs: Vec<Vec<f64>>,
}

impl ForwardPass {
    fn with_capacity(layers: usize) -> Self {
        ForwardPass {
            inputs: Vec::with_capacity(layers),
            potentials: Vec::with_capacity(layers),
            outputs: Vec::with_capacity(layers),
        }
    }

    /// Returns the outputs of the output layer.
    pub fn estimated_values(&self) -> &[f64] {
        self.outputs.last().map_or(&[], |outputs| &outputs[..])
    }

    /// Returns the vector fed to every unit of `layer`.
    pub fn inputs_of_layer(&self, layer: usize) -> Option<&[f64]> {
        self.inputs.get(layer).map(|inputs| &inputs[..])
    }

    pub fn potentials_of_layer(&self, layer: usize) -> Option<&[f64]> {
        self.potentials.get(layer).map(|potentials| &potentials[..])
    }

    pub fn outputs_of_layer(&self, layer: usize) -> Option<&[f64]> {
        self.outputs.get(layer).map(|outputs| &outputs[..])
    }

    /// Returns the number of layers recorded.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Computes the summed squared error between `actual` and `expected`.
pub fn squared_error(actual: &[f64], expected: &[f64]) -> f64 {
    actual
        .iter()
        .zip(expected)
        .map(|(a, e)| (e - a) * (e - a))
        .sum()
}
