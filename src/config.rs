//! Declarative model configuration.
//!
//! A configuration is usually loaded from JSON:
//!
//! ```
//! # use perceptron::config::*;
//! let config = ModelConfig::from_json(r#"{
//!     "task": "classification",
//!     "trainType": "minibatch",
//!     "hyperparameters": { "learningRate": 0.1, "batchSize": 4 },
//!     "layers": [
//!         { "type": "input",  "inputs": 4 },
//!         { "type": "hidden", "inputs": 4, "units": 8, "activation": "tanh" },
//!         { "type": "output", "inputs": 8, "units": 3, "activation": "sigmoid" }
//!     ]
//! }"#).unwrap();
//! assert_eq!(config.train_type, TrainType::Minibatch);
//! assert_eq!(config.batch_size(), 4);
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use crate::activator::ActivationRegistry;
use crate::error::{Error, Result};

/// Mini-batch size used when the configuration does not set one.
pub const DEFAULT_BATCH_SIZE: usize = 2;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub layers: Vec<LayerConfig>,
    pub task: Task,
    #[serde(alias = "traintype")]
    pub train_type: TrainType,
    pub hyperparameters: Hyperparameters,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    pub inputs: usize,
    /// Ignored for the input layer.
    #[serde(default)]
    pub units: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Input,
    Hidden,
    #[serde(alias = "final")]
    Output,
}

/// What the model is used for. Each task restricts the output layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    #[serde(alias = "linear_regression")]
    Regression,
    #[serde(alias = "logistic_regression")]
    Classification,
    BinaryClassification,
}

impl Task {
    /// Returns true if `activation` may be used by the output layer.
    pub fn permits(&self, activation: &str) -> bool {
        match self {
            Task::Regression => activation == "relu" || activation == "linear",
            Task::Classification | Task::BinaryClassification => activation == "sigmoid",
        }
    }

    /// Returns true if desired values must be 0 or 1.
    pub fn is_classification(&self) -> bool {
        match self {
            Task::Regression => false,
            Task::Classification | Task::BinaryClassification => true,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Task::Regression => write!(f, "regression"),
            Task::Classification => write!(f, "classification"),
            Task::BinaryClassification => write!(f, "binary classification"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainType {
    Online,
    #[serde(alias = "batch")]
    Fullbatch,
    Minibatch,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperparameters {
    #[serde(default)]
    pub learning_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

impl ModelConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        ModelConfig::from_json(&fs::read_to_string(path)?)
    }

    /// Returns the validated learning rate.
    pub fn learning_rate(&self) -> Result<f64> {
        match self.hyperparameters.learning_rate {
            None => Err(Error::MissingLearningRate),
            Some(rate) if !rate.is_finite() => Err(Error::InvalidLearningRate(rate)),
            Some(rate) => Ok(rate),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.hyperparameters.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    /// Returns the number of inputs of the network, as declared by the input
    /// layer.
    pub fn input_len(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.inputs)
    }

    /// Verifies the structure of the configuration, returning the first
    /// problem found.
    ///
    /// Layer indices in errors count the input layer as layer 0, as they are
    /// written in the configuration.
    pub fn validate(&self, registry: &ActivationRegistry) -> Result<()> {
        let input = self.layers.first().ok_or(Error::NoLayers)?;
        if input.layer_type != LayerType::Input {
            return Err(Error::FirstLayerNotInput);
        }
        if input.activation.is_some() {
            return Err(Error::InputActivation);
        }
        if input.inputs == 0 {
            return Err(Error::EmptyInput);
        }
        if self.layers.len() < 2 {
            return Err(Error::NoComputingLayers);
        }
        let last_index = self.layers.len() - 1;
        if self.layers[last_index].layer_type != LayerType::Output {
            return Err(Error::LastLayerNotOutput);
        }

        let mut previous_units = input.inputs;
        for (i, layer) in self.layers.iter().enumerate().skip(1) {
            if i != last_index && layer.layer_type != LayerType::Hidden {
                return Err(Error::MisplacedLayer(i));
            }
            if layer.units == 0 {
                return Err(Error::EmptyLayer(i));
            }
            if layer.inputs != previous_units {
                return Err(Error::LayerWidth {
                    layer: i,
                    expected: previous_units,
                    got: layer.inputs,
                });
            }
            match layer.activation {
                None => return Err(Error::MissingActivation(i)),
                Some(ref name) if !registry.contains(name) => {
                    return Err(Error::UnknownActivation(name.clone()));
                }
                Some(_) => {}
            }
            previous_units = layer.units;
        }

        self.learning_rate()?;
        if self.hyperparameters.batch_size == Some(0) {
            return Err(Error::ZeroBatchSize);
        }
        self.validate_task()
    }

    fn validate_task(&self) -> Result<()> {
        let output = &self.layers[self.layers.len() - 1];
        let activation = output.activation.as_deref().unwrap_or_default();
        if !self.task.permits(activation) {
            return Err(Error::TaskActivation {
                task: self.task,
                activation: activation.to_owned(),
            });
        }
        if self.task == Task::BinaryClassification && output.units != 1 {
            return Err(Error::BinaryOutputs(output.units));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(layer_type: LayerType, inputs: usize, units: usize, activation: &str) -> LayerConfig {
        LayerConfig {
            layer_type,
            inputs,
            units,
            activation: if activation.is_empty() {
                None
            } else {
                Some(activation.to_owned())
            },
        }
    }

    fn config(layers: Vec<LayerConfig>) -> ModelConfig {
        ModelConfig {
            layers,
            task: Task::Classification,
            train_type: TrainType::Online,
            hyperparameters: Hyperparameters {
                learning_rate: Some(0.1),
                batch_size: None,
            },
        }
    }

    fn valid() -> ModelConfig {
        config(vec![
            layer(LayerType::Input, 2, 0, ""),
            layer(LayerType::Hidden, 2, 3, "relu"),
            layer(LayerType::Hidden, 3, 4, "tanh"),
            layer(LayerType::Output, 4, 2, "sigmoid"),
        ])
    }

    fn validate(config: &ModelConfig) -> Result<()> {
        config.validate(&ActivationRegistry::default())
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn parses_json() {
        let config = ModelConfig::from_json(
            r#"{
                "task": "logistic_regression",
                "traintype": "batch",
                "hyperparameters": { "learningRate": 0.001 },
                "layers": [
                    { "type": "input", "inputs": 2, "pre_process": "nothing" },
                    { "type": "hidden", "inputs": 2, "units": 3, "activation": "sigmoid" },
                    { "type": "final", "inputs": 3, "units": 2, "activation": "sigmoid" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.task, Task::Classification);
        assert_eq!(config.train_type, TrainType::Fullbatch);
        assert_eq!(config.layers[2].layer_type, LayerType::Output);
        assert_eq!(config.batch_size(), DEFAULT_BATCH_SIZE);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn rejects_unknown_task() {
        let json = r#"{
            "task": "clustering",
            "trainType": "online",
            "hyperparameters": { "learningRate": 0.1 },
            "layers": []
        }"#;
        assert!(matches!(ModelConfig::from_json(json), Err(Error::Json(_))));
    }

    #[test]
    fn every_width_mismatch_fails() {
        for i in 1..4 {
            let mut config = valid();
            config.layers[i].inputs += 1;
            match validate(&config) {
                Err(Error::LayerWidth { layer, .. }) => assert_eq!(layer, i),
                other => panic!("layer {}: unexpected {:?}", i, other),
            }
        }
    }

    #[test]
    fn wrong_first_layer() {
        let mut config = valid();
        config.layers[0].layer_type = LayerType::Hidden;
        assert!(matches!(validate(&config), Err(Error::FirstLayerNotInput)));
    }

    #[test]
    fn wrong_last_layer() {
        let mut config = valid();
        config.layers[3].layer_type = LayerType::Hidden;
        assert!(matches!(validate(&config), Err(Error::LastLayerNotOutput)));
    }

    #[test]
    fn output_layer_in_the_middle() {
        let mut config = valid();
        config.layers[1].layer_type = LayerType::Output;
        assert!(matches!(validate(&config), Err(Error::MisplacedLayer(1))));
    }

    #[test]
    fn input_layer_with_activation() {
        let mut config = valid();
        config.layers[0].activation = Some("relu".to_owned());
        assert!(matches!(validate(&config), Err(Error::InputActivation)));
    }

    #[test]
    fn only_input_layer() {
        let single = config(vec![layer(LayerType::Input, 2, 0, "")]);
        assert!(matches!(validate(&single), Err(Error::NoComputingLayers)));
        let empty = config(vec![]);
        assert!(matches!(validate(&empty), Err(Error::NoLayers)));
    }

    #[test]
    fn zero_batch_size() {
        let mut config = valid();
        config.hyperparameters.batch_size = Some(0);
        assert!(matches!(validate(&config), Err(Error::ZeroBatchSize)));
    }

    #[test]
    fn empty_layer() {
        let mut config = valid();
        config.layers[2].units = 0;
        assert!(matches!(validate(&config), Err(Error::EmptyLayer(2))));
    }

    #[test]
    fn unknown_activation() {
        let mut config = valid();
        config.layers[1].activation = Some("swish".to_owned());
        assert!(matches!(validate(&config), Err(Error::UnknownActivation(_))));
        config.layers[1].activation = None;
        assert!(matches!(validate(&config), Err(Error::MissingActivation(1))));
    }

    #[test]
    fn learning_rate_checks() {
        let mut config = valid();
        config.hyperparameters.learning_rate = None;
        assert!(matches!(validate(&config), Err(Error::MissingLearningRate)));
        for &rate in &[std::f64::NAN, std::f64::INFINITY, std::f64::NEG_INFINITY] {
            config.hyperparameters.learning_rate = Some(rate);
            assert!(matches!(validate(&config), Err(Error::InvalidLearningRate(_))));
        }
    }

    #[test]
    fn task_restricts_output_activation() {
        let mut config = valid();
        config.layers[3].activation = Some("relu".to_owned());
        assert!(matches!(validate(&config), Err(Error::TaskActivation { .. })));

        config.task = Task::Regression;
        assert!(validate(&config).is_ok());
        config.layers[3].activation = Some("linear".to_owned());
        assert!(validate(&config).is_ok());
        config.layers[3].activation = Some("sigmoid".to_owned());
        assert!(matches!(validate(&config), Err(Error::TaskActivation { .. })));
    }

    #[test]
    fn binary_classification_needs_one_output() {
        let mut config = valid();
        config.task = Task::BinaryClassification;
        assert!(matches!(validate(&config), Err(Error::BinaryOutputs(2))));
        config.layers[3].units = 1;
        assert!(validate(&config).is_ok());
    }
}
