use crate::activator::Activator;
use crate::error::{Error, Result};
use crate::params::{ParameterStore, UnitId};

/// A single neuron.
///
/// A unit only knows its position and activation function. Its weights and
/// bias live in the network's `ParameterStore`, keyed by the unit's id.
#[derive(Clone, Debug)]
pub struct Unit {
    id: UnitId,
    activator: Activator,
    input_len: usize,
}

impl Unit {
    pub fn new(id: UnitId, activator: Activator, input_len: usize) -> Self {
        Unit {
            id,
            activator,
            input_len,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn activator(&self) -> Activator {
        self.activator
    }

    /// Returns the number of inputs, which is also the number of weights.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Computes the weighted sum of `inputs` plus the bias.
    pub fn potential(&self, params: &ParameterStore, inputs: &[f64]) -> Result<f64> {
        if inputs.len() != self.input_len {
            return Err(Error::BadInputs {
                expected: self.input_len,
                got: inputs.len(),
            });
        }
        let unit = params.get(self.id)?;
        let sum: f64 = unit.weights.iter().zip(inputs).map(|(w, x)| w * x).sum();
        Ok(sum + unit.bias)
    }

    /// Returns the `(potential, output)` pair of this unit for `inputs`.
    pub fn evaluate(&self, params: &ParameterStore, inputs: &[f64]) -> Result<(f64, f64)> {
        let potential = self.potential(params, inputs)?;
        Ok((potential, self.activator.f(potential)))
    }
}
