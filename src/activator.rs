//! Activation function types and the registry that resolves them by name.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
#[derive(Copy, Clone, Debug)]
pub enum Activator {
    /// Rectified Linear Unit
    ReLU,
    /// Leaky Rectified Linear Unit
    ///
    /// Takes an `alpha` value to use for negative inputs.
    LeakyReLU(f64),
    /// Sigmoid function
    Sigmoid,
    /// Hyperbolic tan function
    TanH,
    /// Identity function
    Linear,
    /// A user supplied function.
    ///
    /// `fprime` must follow the same convention as the built-in activators:
    /// it receives the *output* of `f`, not its input.
    Custom {
        f: fn(f64) -> f64,
        fprime: fn(f64) -> f64,
    },
}

impl Activator {
    /// Evaluates `f(x)` for the selected the activation function.
    pub fn f(&self, x: f64) -> f64 {
        match *self {
            Activator::ReLU => if x > 0.0 { x } else { 0.0 },
            Activator::LeakyReLU(alpha) => if x > 0.0 { x } else { alpha * x },
            Activator::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activator::TanH => 2.0 / (1.0 + (-2.0 * x).exp()) - 1.0,
            Activator::Linear => x,
            Activator::Custom { f, .. } => f(x),
        }
    }

    /// Evaluates the derivative `f'(x)`, where `x = f^{-1}(y)`.
    ///
    /// Note that this function takes in the *output* of the activation
    /// function, rather than the input.
    pub fn fprime(&self, y: f64) -> f64 {
        match *self {
            Activator::ReLU => if y > 0.0 { 1.0 } else { 0.0 },
            Activator::LeakyReLU(alpha) => if y > 0.0 { 1.0 } else { alpha },
            Activator::Sigmoid => y * (1.0 - y),
            Activator::TanH => 1.0 - y * y,
            Activator::Linear => 1.0,
            Activator::Custom { fprime, .. } => fprime(y),
        }
    }
}

/// Maps activation names, as they appear in a model configuration, to
/// activators.
///
/// The default registry knows `sigmoid`, `relu`, `leaky_relu`, `tanh` and
/// `linear`.
#[derive(Clone, Debug)]
pub struct ActivationRegistry {
    activators: HashMap<String, Activator>,
}

impl ActivationRegistry {
    /// Returns a registry without any activation functions.
    pub fn empty() -> Self {
        ActivationRegistry {
            activators: HashMap::new(),
        }
    }

    /// Registers `activator` under `name`, replacing any previous entry.
    pub fn register<S: Into<String>>(&mut self, name: S, activator: Activator) -> &mut Self {
        self.activators.insert(name.into(), activator);
        self
    }

    /// Looks up the activator registered under `name`.
    pub fn get(&self, name: &str) -> Result<Activator> {
        self.activators
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownActivation(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.activators.contains_key(name)
    }
}

impl Default for ActivationRegistry {
    fn default() -> Self {
        let mut registry = ActivationRegistry::empty();
        registry
            .register("sigmoid", Activator::Sigmoid)
            .register("relu", Activator::ReLU)
            .register("leaky_relu", Activator::LeakyReLU(0.01))
            .register("tanh", Activator::TanH)
            .register("linear", Activator::Linear);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn softsign(x: f64) -> f64 {
        x / (1.0 + x.abs())
    }

    fn softsign_prime(y: f64) -> f64 {
        (1.0 - y.abs()) * (1.0 - y.abs())
    }

    #[test]
    fn derivatives_take_outputs() {
        // For every activator, fprime(f(x)) must match a finite difference of f.
        let activators = [
            Activator::Sigmoid,
            Activator::TanH,
            Activator::ReLU,
            Activator::LeakyReLU(0.1),
            Activator::Linear,
            Activator::Custom {
                f: softsign,
                fprime: softsign_prime,
            },
        ];
        let h = 1e-6;
        for activator in &activators {
            for &x in &[-2.0, -0.5, 0.3, 1.7] {
                let numeric = (activator.f(x + h) - activator.f(x - h)) / (2.0 * h);
                let analytic = activator.fprime(activator.f(x));
                assert!(
                    (numeric - analytic).abs() < 1e-6,
                    "{:?} at {}: {} vs {}",
                    activator,
                    x,
                    numeric,
                    analytic
                );
            }
        }
    }

    #[test]
    fn sigmoid_values() {
        assert_eq!(Activator::Sigmoid.f(0.0), 0.5);
        assert_eq!(Activator::Sigmoid.fprime(0.5), 0.25);
    }

    #[test]
    fn default_registry() {
        let registry = ActivationRegistry::default();
        for name in &["sigmoid", "relu", "leaky_relu", "tanh", "linear"] {
            assert!(registry.contains(name));
        }
        assert!(matches!(
            registry.get("softmax"),
            Err(Error::UnknownActivation(ref name)) if name == "softmax"
        ));
    }

    #[test]
    fn register_custom() {
        let mut registry = ActivationRegistry::empty();
        registry.register(
            "softsign",
            Activator::Custom {
                f: softsign,
                fprime: softsign_prime,
            },
        );
        let activator = registry.get("softsign").unwrap();
        assert_eq!(activator.f(1.0), 0.5);
        assert_eq!(activator.fprime(0.5), 0.25);
        assert!(!registry.contains("sigmoid"));
    }
}
