//! Plain gradient descent.

use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::gradient::GradientStore;

/// Moves every parameter against its gradient, scaled by a fixed learning
/// rate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    pub fn new(learning_rate: f64) -> Self {
        GradientDescent { learning_rate }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Applies `w -= rate * dw` and `b -= rate * db` to every unit of
    /// `network`.
    ///
    /// Each unit of the network must have a gradient in `gradients`, with as
    /// many weight derivatives as the unit has weights. Nothing is modified
    /// unless every unit does.
    pub fn apply(&self, gradients: &GradientStore, network: &mut Network) -> Result<()> {
        for unit in network.units() {
            let gradient = gradients.get(unit.id())?;
            if gradient.weights.len() != unit.input_len() {
                return Err(Error::WeightCount {
                    layer: unit.id().layer,
                    unit: unit.id().unit,
                    expected: unit.input_len(),
                    got: gradient.weights.len(),
                });
            }
        }

        let ids: Vec<_> = network.units().map(|unit| unit.id()).collect();
        for id in ids {
            let gradient = gradients.get(id)?;
            let (weights, bias) = network.params_mut().params_mut(id)?;
            for (w, g) in weights.iter_mut().zip(&gradient.weights) {
                *w -= self.learning_rate * g;
            }
            *bias -= self.learning_rate * gradient.bias;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backprop::backpropagate;
    use crate::feed_forward::tests::{network, textbook_network};
    use crate::params::UnitId;

    #[test]
    fn update_law_is_exact() {
        let mut network = textbook_network();
        let before = network.params().clone();
        let pass = network.evaluate(&[2.7810836, 2.550537003]).unwrap();
        let gradients = backpropagate(&network, &pass, &[1.0]).unwrap();

        let optimizer = GradientDescent::new(0.3);
        optimizer.apply(&gradients, &mut network).unwrap();

        for (id, old) in before.iter() {
            let new = network.params().get(*id).unwrap();
            let gradient = gradients.get(*id).unwrap();
            for i in 0..old.weights.len() {
                assert_eq!(new.weights[i], old.weights[i] - 0.3 * gradient.weights[i]);
            }
            assert_eq!(new.bias, old.bias - 0.3 * gradient.bias);
        }
    }

    #[test]
    fn missing_gradient_is_an_error() {
        let mut network = network(&[2, 2, 1], "sigmoid", "sigmoid");
        let before = network.params().clone();
        let mut gradients = GradientStore::new();
        gradients.store_gradient_of(UnitId::new(0, 0), 1.0, &[1.0, 1.0]);
        gradients.store_gradient_of(UnitId::new(0, 1), 1.0, &[1.0, 1.0]);

        assert!(matches!(
            GradientDescent::new(0.1).apply(&gradients, &mut network),
            Err(Error::MissingGradient { layer: 1, unit: 0 })
        ));
        assert_eq!(network.params(), &before);
    }

    #[test]
    fn wrong_gradient_width_is_an_error() {
        let mut network = network(&[2, 1], "sigmoid", "sigmoid");
        let mut gradients = GradientStore::new();
        gradients.store_gradient_of(UnitId::new(0, 0), 1.0, &[1.0]);
        assert!(matches!(
            GradientDescent::new(0.1).apply(&gradients, &mut network),
            Err(Error::WeightCount {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }
}
