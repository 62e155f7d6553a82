use itertools::multizip;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::activator::Activator;
use crate::config::LayerType;
use crate::error::{Error, Result};
use crate::params::{ParameterStore, UnitId, UnitParams};
use crate::unit::Unit;

/// A fully connected layer of a neural network.
///
/// Every unit of the layer receives the same inputs and uses the same
/// activation function.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Position in the network, not counting the input layer.
    index: usize,
    layer_type: LayerType,
    /// The registry name of the activation function.
    activation: String,
    activator: Activator,
    input_len: usize,
    units: Vec<Unit>,
}

impl Layer {
    /// Initializes a new layer.
    ///
    /// Arguments:
    ///
    ///  * `index` - the position of the layer, the first hidden layer being 0.
    ///  * `layer_type` - whether this is a hidden or the output layer.
    ///  * `activation` - the name and the function used for every unit's
    ///                   output.
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `outputs` - the number of units in this layer.
    pub fn new(
        index: usize,
        layer_type: LayerType,
        activation: (&str, Activator),
        inputs: usize,
        outputs: usize,
    ) -> Self {
        let (name, activator) = activation;
        let units = (0..outputs)
            .map(|i| Unit::new(UnitId::new(index, i), activator, inputs))
            .collect();
        Layer {
            index,
            layer_type,
            activation: name.to_owned(),
            activator,
            input_len: inputs,
            units,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn layer_type(&self) -> LayerType {
        self.layer_type
    }

    pub fn is_output(&self) -> bool {
        self.layer_type == LayerType::Output
    }

    pub fn activation(&self) -> &str {
        &self.activation
    }

    pub fn activator(&self) -> Activator {
        self.activator
    }

    /// Returns the number of inputs to this layer.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Returns the number of outputs from this layer.
    pub fn output_len(&self) -> usize {
        self.units.len()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    /// Stores parameters for every unit, sampled uniformly from `[0, 1)`.
    pub fn initialize<R: Rng>(&self, params: &mut ParameterStore, rng: &mut R) {
        let between = Uniform::from(0.0..1.0);
        for unit in &self.units {
            let weights = (0..self.input_len).map(|_| between.sample(&mut *rng)).collect();
            let bias = between.sample(&mut *rng);
            params.insert(unit.id(), UnitParams::new(weights, bias));
        }
    }

    /// Feeds the provided `inputs` forward through the layer, writing the
    /// potential and the output of every unit.
    pub fn forward(
        &self,
        params: &ParameterStore,
        inputs: &[f64],
        potentials: &mut [f64],
        outputs: &mut [f64],
    ) -> Result<()> {
        if inputs.len() != self.input_len {
            return Err(Error::BadInputs {
                expected: self.input_len,
                got: inputs.len(),
            });
        }
        debug_assert_eq!(potentials.len(), self.output_len());
        debug_assert_eq!(outputs.len(), self.output_len());
        for (unit, p, y) in multizip((
            self.units.iter(),
            potentials.iter_mut(),
            outputs.iter_mut(),
        )) {
            let (potential, output) = unit.evaluate(params, inputs)?;
            *p = potential;
            *y = output;
        }
        Ok(())
    }
}
