//! A fully-connected feed-forward neural network (multilayer perceptron)
//! trained with per-sample backpropagation and plain gradient descent.
//!
//! # Example
//!
//! Let's train a small network on the XOR function:
//!
//! ```
//! # use perceptron::*;
//! let config: ModelConfig = serde_json::from_str(r#"{
//!     "task": "binary_classification",
//!     "trainType": "online",
//!     "hyperparameters": { "learningRate": 0.5 },
//!     "layers": [
//!         { "type": "input",  "inputs": 2 },
//!         { "type": "hidden", "inputs": 2, "units": 3, "activation": "relu" },
//!         { "type": "output", "inputs": 3, "units": 1, "activation": "sigmoid" }
//!     ]
//! }"#).unwrap();
//!
//! let examples = vec![(vec![0.0, 1.0], vec![1.0]),
//!                     (vec![1.0, 0.0], vec![1.0]),
//!                     (vec![0.0, 0.0], vec![0.0]),
//!                     (vec![1.0, 1.0], vec![0.0])];
//!
//! let mlp = Mlp::new(config, &ActivationRegistry::default()).unwrap();
//! let result = mlp.train(&examples, 50).unwrap();
//! assert_eq!(result.loss_history.len(), 50);
//! assert_eq!(result.model.network().run(&[1.0, 0.0]).unwrap().len(), 1);
//! ```

extern crate itertools;
#[macro_use]
extern crate log;
extern crate rand;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate thiserror;

pub mod activator;
pub mod backprop;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod feed_forward;
pub mod gradient;
pub mod layer;
pub mod mlp;
pub mod optimizer;
pub mod params;
pub mod trainer;
pub mod unit;

pub use crate::activator::{ActivationRegistry, Activator};
pub use crate::config::{Hyperparameters, LayerConfig, LayerType, ModelConfig, Task, TrainType};
pub use crate::dataset::Dataset;
pub use crate::error::{Error, Result};
pub use crate::export::ExportedModel;
pub use crate::feed_forward::{ForwardPass, Network};
pub use crate::gradient::{GradientStore, UnitGradient};
pub use crate::mlp::{Mlp, TrainingResult};
pub use crate::optimizer::GradientDescent;
pub use crate::params::{ParameterStore, UnitId, UnitParams};
pub use crate::trainer::{LearningMode, Logging, Trainable, Trained, Trainer};
