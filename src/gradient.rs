//! Containers for the derivatives computed by backpropagation.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::params::UnitId;

/// The derivatives of the loss with respect to one unit's parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitGradient {
    /// Derivative with respect to the bias. This is also the derivative with
    /// respect to the unit's potential, from which the weight derivatives
    /// are derived.
    pub bias: f64,
    /// Derivative with respect to each weight.
    pub weights: Vec<f64>,
}

impl UnitGradient {
    /// Builds the gradient of a unit from its derivative and the inputs it
    /// received. The potential is linear in each weight, so the derivative
    /// with respect to weight `i` is `derivative * inputs[i]`.
    pub fn from_derivative(derivative: f64, inputs: &[f64]) -> Self {
        UnitGradient {
            bias: derivative,
            weights: inputs.iter().map(|x| derivative * x).collect(),
        }
    }

    fn add(&mut self, other: &UnitGradient) {
        if self.weights.len() < other.weights.len() {
            self.weights.resize(other.weights.len(), 0.0);
        }
        for (sum, g) in self.weights.iter_mut().zip(&other.weights) {
            *sum += g;
        }
        self.bias += other.bias;
    }

    fn divide(&mut self, divisor: f64) {
        for g in &mut self.weights {
            *g /= divisor;
        }
        self.bias /= divisor;
    }
}

/// Gradients of every unit for one training step.
///
/// A store either holds the gradients of a single sample, or the sum of the
/// gradients of several samples together with how many were summed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GradientStore {
    units: BTreeMap<UnitId, UnitGradient>,
    samples: usize,
}

impl GradientStore {
    pub fn new() -> Self {
        GradientStore::default()
    }

    /// Returns an empty store for the gradients of one sample.
    pub(crate) fn for_sample() -> Self {
        GradientStore {
            units: BTreeMap::new(),
            samples: 1,
        }
    }

    /// Records the derivative of `unit` with respect to its potential, and
    /// the weight derivatives that follow from the unit's `inputs`.
    ///
    /// Overwrites anything previously stored for the unit.
    pub fn store_gradient_of(&mut self, unit: UnitId, derivative: f64, inputs: &[f64]) {
        self.units
            .insert(unit, UnitGradient::from_derivative(derivative, inputs));
    }

    /// Returns the derivative of the loss with respect to the unit's
    /// potential.
    pub fn unit_derivative(&self, unit: UnitId) -> Result<f64> {
        self.get(unit).map(|gradient| gradient.bias)
    }

    pub fn get(&self, unit: UnitId) -> Result<&UnitGradient> {
        self.units.get(&unit).ok_or(Error::MissingGradient {
            layer: unit.layer,
            unit: unit.unit,
        })
    }

    /// Adds the gradients of `other` onto this store. Units seen for the
    /// first time start from zero.
    pub fn accumulate(&mut self, other: &GradientStore) {
        for (id, gradient) in &other.units {
            self.units.entry(*id).or_default().add(gradient);
        }
        self.samples += other.samples;
    }

    /// Returns the number of samples whose gradients were summed here.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the mean gradient over the accumulated samples.
    pub fn mean(&self) -> GradientStore {
        let mut mean = self.clone();
        if self.samples > 0 {
            let count = self.samples as f64;
            for gradient in mean.units.values_mut() {
                gradient.divide(count);
            }
            mean.samples = 1;
        }
        mean
    }

    /// Removes every gradient, ready for the next batch.
    pub fn clear(&mut self) {
        self.units.clear();
        self.samples = 0;
    }

    /// Iterates over all units in (layer, unit) order.
    pub fn iter(&self) -> btree_map::Iter<UnitId, UnitGradient> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
